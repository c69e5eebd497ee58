//! Antecedent basis.
//!
//! Patent drafting requires that a feature referenced with 所述/该 was
//! introduced earlier: in the same claim before the reference, or in any
//! claim reachable through the citation chain. The claim preamble (text
//! before the first `，`) is exempt, since that is where the citation phrase
//! itself lives. This check is heuristic and documented best-effort: the
//! feature name after a marker has no grammatical delimiter, so extraction
//! prefers a legend-description prefix and otherwise cuts at common function
//! words.

use std::collections::HashSet;

use crate::{
    domain::{ClaimDocument, LegendMap},
    report::{Finding, FindingKind},
};

const MARKERS: [&str; 2] = ["所述", "该"];

/// Function words that terminate a heuristically extracted feature name.
const BOUNDARY: [char; 17] = [
    '的', '为', '与', '和', '或', '由', '是', '在', '上', '中', '内', '外', '被', '向', '从',
    '对', '至',
];

/// Extracted candidates that are never feature names.
const STOP_WORDS: [&str; 6] = ["权利要求", "上述", "任一", "任意", "其中", "步骤"];

const MAX_CANDIDATE_CHARS: usize = 6;
const MIN_CANDIDATE_CHARS: usize = 2;

/// Checks every 所述/该 reference in each claim body for antecedent basis.
///
/// The legend, when supplied, refines candidate extraction: the longest
/// legend description prefixing the text after a marker is taken verbatim.
#[must_use]
pub fn run(document: &ClaimDocument, legend: Option<&LegendMap>) -> Vec<Finding> {
    let mut findings = Vec::new();

    for claim in document.claims() {
        let text = claim.text();
        let Some(comma) = text.find('，') else {
            continue;
        };
        let body_start = comma + '，'.len_utf8();
        let body = &text[body_start..];

        let ancestors = document.ancestors(claim.id());
        let mut reported: HashSet<String> = HashSet::new();

        let mut markers: Vec<(usize, &str)> = MARKERS
            .iter()
            .flat_map(|marker| body.match_indices(marker).map(|(pos, m)| (pos, m)))
            .collect();
        markers.sort_unstable();

        for (pos, marker) in markers {
            let after = &body[pos + marker.len()..];
            let Some(candidate) = extract_candidate(after, legend) else {
                continue;
            };
            if !reported.insert(candidate.clone()) {
                continue;
            }

            let earlier = &text[..body_start + pos];
            let has_basis = earlier.contains(&candidate)
                || ancestors
                    .iter()
                    .any(|ancestor| ancestor.text().contains(&candidate));

            if !has_basis {
                findings.push(Finding::new(
                    FindingKind::MissingAntecedentBasis,
                    Some(claim.id()),
                    format!(
                        "\"{candidate}\"缺少引用基础，未在本权利要求的在先内容或其引用的权利要求中出现"
                    ),
                ));
            }
        }
    }

    findings
}

/// Extracts the feature name following a marker, or `None` when nothing
/// usable follows.
fn extract_candidate(after: &str, legend: Option<&LegendMap>) -> Option<String> {
    if let Some(legend) = legend {
        if let Some(entry) = legend
            .entries_longest_first()
            .iter()
            .find(|entry| after.starts_with(entry.description()))
        {
            return Some(entry.description().to_string());
        }
    }

    let mut candidate = String::new();
    let mut chars = 0;
    for ch in after.chars() {
        if chars >= MAX_CANDIDATE_CHARS || BOUNDARY.contains(&ch) || !ch.is_alphabetic() {
            break;
        }
        candidate.push(ch);
        chars += 1;
    }

    if chars < MIN_CANDIDATE_CHARS || STOP_WORDS.contains(&candidate.as_str()) {
        None
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;

    use super::*;
    use crate::{domain::LegendEntry, parse::segment};

    fn check(text: &str) -> Vec<Finding> {
        run(&ClaimDocument::new(segment(text)), None)
    }

    #[test]
    fn basis_in_an_ancestor_claim_passes() {
        let findings = check(
            "1. 一种装置，包括固定槽。\n2. 根据权利要求1所述的装置，其中所述固定槽为金属。",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn basis_earlier_in_the_same_claim_passes() {
        let findings = check("1. 一种装置，包括固定槽，所述固定槽为金属。");
        assert!(findings.is_empty());
    }

    #[test]
    fn missing_basis_is_a_warning() {
        let findings = check(
            "1. 一种装置，包括固定槽。\n2. 根据权利要求1所述的装置，其中所述连接杆为金属。",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::MissingAntecedentBasis);
        assert_eq!(findings[0].claim_id, Some(2));
        assert!(findings[0].message.contains("连接杆"));
    }

    #[test]
    fn basis_is_not_found_through_unrelated_claims() {
        // Claim 3 does not cite claim 1, so 固定槽 has no basis there.
        let findings = check(
            "1. 一种装置，包括固定槽。\n2. 一种方法，加工零件。\n3. 根据权利要求2所述的方法，其中所述固定槽为金属。",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].claim_id, Some(3));
    }

    #[test]
    fn preamble_is_exempt() {
        // No full-width comma: the whole claim is preamble.
        assert!(check("1. 所述固定槽。").is_empty());
    }

    #[test]
    fn stop_words_are_not_candidates() {
        assert!(check("1. 一种装置，该权利要求1中。").is_empty());
    }

    #[test]
    fn legend_refines_candidate_extraction() {
        let mut legend = LegendMap::default();
        legend.push(LegendEntry::new(
            "1".parse().unwrap(),
            NonEmptyString::new("固定槽".to_string()).unwrap(),
        ));

        let document = ClaimDocument::new(segment("1. 一种装置，其中所述固定槽板不牢固。"));
        let findings = run(&document, Some(&legend));

        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("\"固定槽\""));
    }

    #[test]
    fn each_candidate_is_reported_once_per_claim() {
        let findings =
            check("1. 一种装置，所述连接杆不牢固，所述连接杆为金属。");
        assert_eq!(findings.len(), 1);
    }
}
