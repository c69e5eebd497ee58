//! Claim-final punctuation.

use crate::{
    domain::ClaimDocument,
    report::{Finding, FindingKind},
};

/// Checks that each claim ends with exactly one `。`, at the very end.
#[must_use]
pub fn run(document: &ClaimDocument) -> Vec<Finding> {
    let mut findings = Vec::new();

    for claim in document.claims() {
        let text = claim.text().trim();

        let body = text.strip_suffix('。').unwrap_or_else(|| {
            findings.push(Finding::new(
                FindingKind::MissingPeriod,
                Some(claim.id()),
                "权利要求文本未以句号结尾".to_string(),
            ));
            text
        });

        if body.contains('。') {
            findings.push(Finding::new(
                FindingKind::MultiplePeriods,
                Some(claim.id()),
                "句号出现在权利要求中部，通常一项权利要求只在末尾使用一个句号".to_string(),
            ));
        }
    }

    findings
}
