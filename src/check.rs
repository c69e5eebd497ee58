//! The checker suite.
//!
//! Each checker is a pure pass over a [`ClaimDocument`] snapshot (plus the
//! legend where one is needed) producing [`Finding`]s; none of them mutate
//! anything or keep state across runs. [`run`] drives the selected checkers
//! and aggregates their output into a [`Report`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{ClaimDocument, LegendMap},
    phonetic::PhoneticProvider,
    report::{Finding, FindingKind, Report},
};

/// Citation validity: unknown, self and forward references.
pub mod citation;
/// Claim-final punctuation.
pub mod punctuation;
/// Claim-numbering continuity.
pub mod numbering;
/// Antecedent basis for 所述/该 features.
pub mod antecedent;
/// Annotated-numeral consistency against the legend.
pub mod numeral;
/// Homophone-typo detection against the legend.
pub mod typo;

/// One selectable check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Citation validity (§ reference resolution).
    Reference,
    /// Claim-final punctuation.
    Period,
    /// Numbering continuity.
    Numbering,
    /// Antecedent basis.
    Antecedent,
    /// Numeral consistency (needs a legend).
    Numeral,
    /// Homophone typos (needs a legend and the phonetic provider).
    Typo,
}

impl CheckKind {
    /// Every check, in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Reference,
        Self::Period,
        Self::Numbering,
        Self::Antecedent,
        Self::Numeral,
        Self::Typo,
    ];

    /// Whether this check cannot run without a parsed legend.
    #[must_use]
    pub const fn requires_legend(self) -> bool {
        matches!(self, Self::Numeral | Self::Typo)
    }
}

/// Everything a check run reads: the document snapshot plus the optional
/// legend and phonetic provider.
///
/// `provider: None` means the phonetic resource could not be acquired; if the
/// typo check is selected the report degrades to a single
/// resource-unavailable warning instead of failing.
pub struct CheckContext<'a> {
    /// The claims under analysis.
    pub document: &'a ClaimDocument,
    /// The legend used by the numeral and typo checks, and to refine
    /// antecedent-candidate extraction.
    pub legend: Option<&'a LegendMap>,
    /// The phonetic provider for the typo check, when available.
    pub provider: Option<&'a dyn PhoneticProvider>,
}

/// Runs the selected checks and aggregates their findings.
///
/// Legend-requiring checks are skipped when no legend is supplied (callers
/// should treat that as a precondition failure before getting here).
#[must_use]
#[tracing::instrument(skip_all, fields(claims = context.document.len(), checks = kinds.len()))]
pub fn run(context: &CheckContext, kinds: &BTreeSet<CheckKind>) -> Report {
    let mut findings = Vec::new();

    for kind in kinds {
        match kind {
            CheckKind::Reference => findings.extend(citation::run(context.document)),
            CheckKind::Period => findings.extend(punctuation::run(context.document)),
            CheckKind::Numbering => findings.extend(numbering::run(context.document)),
            CheckKind::Antecedent => {
                findings.extend(antecedent::run(context.document, context.legend));
            }
            CheckKind::Numeral => {
                if let Some(legend) = context.legend {
                    findings.extend(numeral::run(context.document, legend));
                } else {
                    tracing::debug!("numeral check skipped: no legend supplied");
                }
            }
            CheckKind::Typo => {
                if let Some(legend) = context.legend {
                    findings.extend(run_typo(context, legend));
                } else {
                    tracing::debug!("typo check skipped: no legend supplied");
                }
            }
        }
    }

    Report::from_findings(findings)
}

/// Runs the typo check, degrading to one resource-unavailable warning when
/// the phonetic provider is absent or fails mid-run.
fn run_typo(context: &CheckContext, legend: &LegendMap) -> Vec<Finding> {
    let Some(provider) = context.provider else {
        return vec![resource_unavailable("拼音资源未能加载".to_string())];
    };

    match typo::run(context.document, legend, provider) {
        Ok(findings) => findings,
        Err(error) => {
            tracing::warn!(%error, "phonetic provider failed during the typo check");
            vec![resource_unavailable(error.to_string())]
        }
    }
}

fn resource_unavailable(detail: String) -> Finding {
    Finding::new(
        FindingKind::ResourceUnavailable,
        None,
        format!("{detail}，本次报告不包含错别字检查结果"),
    )
}
