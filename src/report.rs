//! Findings and the aggregated check report.
//!
//! Every analysis in this crate communicates through [`Finding`] values:
//! pure, severity-tagged outputs that never mutate state. The
//! [`Report`] aggregator collects findings from all active checkers, sorts
//! them by claim id (document-level findings first) and removes exact
//! duplicates before display.

use std::{collections::HashSet, fmt};

use serde::Serialize;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A structural defect that must be fixed.
    Error,
    /// A best-effort observation that deserves review.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Error => write!(f, "错误"),
            Self::Warning => write!(f, "警告"),
        }
    }
}

/// The category of a finding.
///
/// Each kind carries a fixed severity and a Chinese display title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    /// A citation names a claim id that does not exist in the document.
    ReferenceNotFound,
    /// A citation names the citing claim itself or a later claim.
    SelfOrForwardReference,
    /// The same claim id appears twice within one citation phrase.
    DuplicateReference,
    /// The claim text does not end with `。`.
    MissingPeriod,
    /// `。` occurs before the final character of the claim.
    MultiplePeriods,
    /// Claim ids are not consecutive.
    NumberingGap,
    /// A `所述`/`该` feature has no antecedent basis.
    MissingAntecedentBasis,
    /// A description is annotated with a numeral other than its legend entry.
    NumeralMismatch,
    /// The expected numeral is present but not enclosed in a matching pair of
    /// parentheses.
    NumeralFormatError,
    /// A text fragment is homophonous with a legend description but spelled
    /// differently.
    PossibleTypo,
    /// One legend description is a strict substring of another.
    OverlappingDescription,
    /// The phonetic-reading resource could not be acquired; typo results are
    /// missing from the report.
    ResourceUnavailable,
}

impl FindingKind {
    /// The fixed severity of this kind.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::ReferenceNotFound
            | Self::SelfOrForwardReference
            | Self::MissingPeriod
            | Self::NumberingGap
            | Self::NumeralMismatch
            | Self::NumeralFormatError => Severity::Error,
            Self::DuplicateReference
            | Self::MultiplePeriods
            | Self::MissingAntecedentBasis
            | Self::PossibleTypo
            | Self::OverlappingDescription
            | Self::ResourceUnavailable => Severity::Warning,
        }
    }

    /// The Chinese display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ReferenceNotFound => "引用对象不存在",
            Self::SelfOrForwardReference => "引用自身或在后权利要求",
            Self::DuplicateReference => "重复引用",
            Self::MissingPeriod => "缺少句号",
            Self::MultiplePeriods => "句号过多",
            Self::NumberingGap => "编号不连续",
            Self::MissingAntecedentBasis => "缺少引用基础",
            Self::NumeralMismatch => "标号不一致",
            Self::NumeralFormatError => "标号格式错误",
            Self::PossibleTypo => "可能的错别字",
            Self::OverlappingDescription => "标记名称重叠",
            Self::ResourceUnavailable => "拼音资源不可用",
        }
    }
}

/// A single severity-tagged observation about the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The finding category.
    pub kind: FindingKind,
    /// The severity, fixed by the kind.
    pub severity: Severity,
    /// The claim this finding concerns, or `None` for document-level
    /// findings.
    pub claim_id: Option<u32>,
    /// Human-readable detail.
    pub message: String,
}

impl Finding {
    /// Creates a finding; the severity is derived from the kind.
    #[must_use]
    pub fn new(kind: FindingKind, claim_id: Option<u32>, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            claim_id,
            message,
        }
    }
}

/// The aggregated result of a check run.
#[derive(Debug, Default)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    /// Aggregates raw findings: stable-sorts by claim id with document-level
    /// findings first, then drops exact duplicates.
    #[must_use]
    pub fn from_findings(mut findings: Vec<Finding>) -> Self {
        findings.sort_by_key(|f| f.claim_id);

        let mut seen: HashSet<(FindingKind, Option<u32>, String)> = HashSet::new();
        findings.retain(|f| seen.insert((f.kind, f.claim_id, f.message.clone())));

        Self { findings }
    }

    /// Returns this report with additional findings folded in, re-sorted and
    /// deduplicated.
    ///
    /// Used to combine checker output with findings produced outside the
    /// checker run, such as legend-parse warnings.
    #[must_use]
    pub fn merged_with(self, extra: Vec<Finding>) -> Self {
        let mut findings = self.findings;
        findings.extend(extra);
        Self::from_findings(findings)
    }

    /// The sorted, deduplicated findings.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Total finding count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns `true` when no findings were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// The number of error-severity findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    /// The number of warning-severity findings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// Returns `true` when the report contains at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.findings.is_empty() {
            return write!(f, "未发现问题");
        }

        writeln!(
            f,
            "共发现 {} 个问题：{} 个错误，{} 个警告",
            self.len(),
            self.error_count(),
            self.warning_count()
        )?;

        let mut current: Option<Option<u32>> = None;
        for finding in &self.findings {
            if current != Some(finding.claim_id) {
                current = Some(finding.claim_id);
                match finding.claim_id {
                    Some(id) => writeln!(f, "【权利要求 {id}】")?,
                    None => writeln!(f, "【文档】")?,
                }
            }
            writeln!(
                f,
                "  [{}] {}：{}",
                finding.severity,
                finding.kind.title(),
                finding.message
            )?;
        }
        Ok(())
    }
}
