//! Claim-numbering continuity.

use crate::{
    domain::ClaimDocument,
    report::{Finding, FindingKind},
};

/// Checks that claim ids run 1, 2, 3, … in document order.
///
/// After a gap the expected counter resynchronizes to the actual id, so one
/// gap produces one finding rather than cascading over every later claim.
#[must_use]
pub fn run(document: &ClaimDocument) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut expected: u32 = 1;

    for claim in document.claims() {
        if claim.id() != expected {
            findings.push(Finding::new(
                FindingKind::NumberingGap,
                Some(claim.id()),
                format!("编号应为{expected}，实际为{}", claim.id()),
            ));
        }
        expected = claim.id() + 1;
    }

    findings
}
