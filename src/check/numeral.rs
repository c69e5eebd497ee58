//! Annotated-numeral consistency.
//!
//! For every legend entry, every annotated occurrence of its description in
//! the claims must carry the entry's numeral, fully enclosed in one matching
//! pair of parentheses (full-width or half-width). A description with no
//! numeral after it is not flagged — un-annotated text is legitimate.

use regex::Regex;

use crate::{
    domain::{ClaimDocument, LegendEntry, LegendMap, numeral::NUMERAL_PATTERN},
    report::{Finding, FindingKind},
};

/// Checks every annotated description occurrence against the legend.
#[must_use]
pub fn run(document: &ClaimDocument, legend: &LegendMap) -> Vec<Finding> {
    let mut findings = Vec::new();

    for entry in legend {
        let Ok(pattern) = annotation_pattern(entry) else {
            continue;
        };

        for claim in document.claims() {
            for caps in pattern.captures_iter(claim.text()) {
                let open = &caps[1];
                let found = &caps[2];
                let close = &caps[3];

                if found != entry.numeral().as_str() {
                    findings.push(Finding::new(
                        FindingKind::NumeralMismatch,
                        Some(claim.id()),
                        format!(
                            "\"{}\"的标号应为{}，实际为{found}",
                            entry.description(),
                            entry.numeral()
                        ),
                    ));
                } else if !is_matched_pair(open, close) {
                    findings.push(Finding::new(
                        FindingKind::NumeralFormatError,
                        Some(claim.id()),
                        format!(
                            "\"{}\"的标号{}未被一对匹配的括号完整包裹",
                            entry.description(),
                            entry.numeral()
                        ),
                    ));
                }
            }
        }
    }

    findings
}

/// `描述 ( 标号 )` with each parenthesis optional, so both missing and
/// half-written annotations are caught.
fn annotation_pattern(entry: &LegendEntry) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "{}\\s*([（(]?)\\s*({NUMERAL_PATTERN})\\s*([)）]?)",
        regex::escape(entry.description())
    ))
}

fn is_matched_pair(open: &str, close: &str) -> bool {
    matches!((open, close), ("(", ")") | ("（", "）"))
}
