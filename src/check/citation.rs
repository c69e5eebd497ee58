//! Citation validity.
//!
//! Every citation phrase in every claim is re-expanded (the same numeral-list
//! grammar segmentation uses) and each cited id classified: unknown ids are
//! errors, self/forward references are errors, repeats within one phrase are
//! warnings. An unknown id is reported once — a claim citing a nonexistent
//! later claim is not additionally flagged as a forward reference.

use std::collections::HashSet;

use crate::{
    domain::ClaimDocument,
    parse::claims::citation_phrases,
    report::{Finding, FindingKind},
};

/// Checks every citation in the document.
#[must_use]
pub fn run(document: &ClaimDocument) -> Vec<Finding> {
    let mut findings = Vec::new();

    for claim in document.claims() {
        for phrase in citation_phrases(claim.text()) {
            let mut seen: HashSet<u32> = HashSet::new();

            for id in phrase.ids {
                if !seen.insert(id) {
                    findings.push(Finding::new(
                        FindingKind::DuplicateReference,
                        Some(claim.id()),
                        format!("权利要求{id}在同一引用中出现多次"),
                    ));
                    continue;
                }

                if !document.contains(id) {
                    findings.push(Finding::new(
                        FindingKind::ReferenceNotFound,
                        Some(claim.id()),
                        format!("引用了不存在的权利要求{id}"),
                    ));
                    continue;
                }

                if id == claim.id() {
                    findings.push(Finding::new(
                        FindingKind::SelfOrForwardReference,
                        Some(claim.id()),
                        format!("权利要求{id}引用了自身"),
                    ));
                } else if id > claim.id() {
                    findings.push(Finding::new(
                        FindingKind::SelfOrForwardReference,
                        Some(claim.id()),
                        format!("引用了在后权利要求{id}"),
                    ));
                }
            }
        }
    }

    findings
}
