//! Homophone-typo detection.
//!
//! A window of claim text that sounds identical to a legend description but
//! is written differently is probably a typo (e.g. 链接杆 for 连接杆). For
//! each description of at least two characters the full set of heteronym
//! reading combinations is precomputed; windows of the same character length
//! are slid over every claim and compared by reading. Best-effort by design:
//! short homophones are common in Chinese, which is why this only ever warns.

use std::collections::{HashMap, HashSet};

use crate::{
    domain::{ClaimDocument, LegendMap},
    phonetic::{Error, PhoneticProvider},
    report::{Finding, FindingKind},
};

/// Descriptions longer than this use a single default reading instead of the
/// full heteronym cross product.
const FULL_EXPANSION_MAX_CHARS: usize = 6;

struct Candidate<'a> {
    description: &'a str,
    readings: HashSet<String>,
}

/// Scans every claim for text windows homophonous with a legend description.
///
/// Findings are deduplicated by (claim, description): one warning per
/// sounds-like pair per claim, however many windows hit it.
///
/// # Errors
///
/// Propagates the provider's [`Error`] so the caller can degrade the report
/// to a resource-unavailable warning.
pub fn run(
    document: &ClaimDocument,
    legend: &LegendMap,
    provider: &dyn PhoneticProvider,
) -> Result<Vec<Finding>, Error> {
    let mut by_length: HashMap<usize, Vec<Candidate>> = HashMap::new();
    let mut known: HashSet<&str> = HashSet::new();

    for entry in legend {
        let description = entry.description();
        let length = description.chars().count();
        if length < 2 {
            continue;
        }
        known.insert(description);

        let readings = readings_of(provider, description, length)?;
        by_length.entry(length).or_default().push(Candidate {
            description,
            readings: readings.into_iter().collect(),
        });
    }

    let mut findings = Vec::new();
    let mut seen: HashSet<(u32, String)> = HashSet::new();

    for claim in document.claims() {
        let chars: Vec<char> = claim.text().chars().collect();

        for (&length, candidates) in &by_length {
            if chars.len() < length {
                continue;
            }

            for window in chars.windows(length) {
                if !window.iter().all(|ch| ch.is_alphabetic()) {
                    continue;
                }
                let text: String = window.iter().collect();
                if known.contains(text.as_str()) {
                    continue;
                }

                let window_readings = readings_of(provider, &text, length)?;

                for candidate in candidates {
                    if text == candidate.description {
                        continue;
                    }
                    if window_readings
                        .iter()
                        .any(|reading| candidate.readings.contains(reading))
                        && seen.insert((claim.id(), candidate.description.to_string()))
                    {
                        findings.push(Finding::new(
                            FindingKind::PossibleTypo,
                            Some(claim.id()),
                            format!(
                                "\"{text}\"与标记名称\"{}\"同音，可能为错别字",
                                candidate.description
                            ),
                        ));
                    }
                }
            }
        }
    }

    Ok(findings)
}

fn readings_of(
    provider: &dyn PhoneticProvider,
    text: &str,
    length: usize,
) -> Result<Vec<String>, Error> {
    provider.readings_of(text, length <= FULL_EXPANSION_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;

    use super::*;
    use crate::{domain::LegendEntry, parse::segment, phonetic::PinyinProvider};

    fn legend(pairs: &[(&str, &str)]) -> LegendMap {
        let mut map = LegendMap::default();
        for (numeral, description) in pairs {
            map.push(LegendEntry::new(
                numeral.parse().unwrap(),
                NonEmptyString::new((*description).to_string()).unwrap(),
            ));
        }
        map
    }

    fn check(legend_pairs: &[(&str, &str)], text: &str) -> Vec<Finding> {
        run(
            &ClaimDocument::new(segment(text)),
            &legend(legend_pairs),
            &PinyinProvider,
        )
        .unwrap()
    }

    #[test]
    fn homophone_window_is_flagged() {
        // 链接杆 sounds like 连接杆 but is written differently.
        let findings = check(&[("3", "连接杆")], "1. 装置包括链接杆。");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::PossibleTypo);
        assert!(findings[0].message.contains("链接杆"));
        assert!(findings[0].message.contains("连接杆"));
    }

    #[test]
    fn exact_description_text_is_not_flagged() {
        let findings = check(&[("3", "连接杆")], "1. 装置包括连接杆。");
        assert!(findings.is_empty());
    }

    #[test]
    fn findings_are_deduplicated_per_claim() {
        let findings = check(
            &[("3", "连接杆")],
            "1. 链接杆连接链接杆。",
        );
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn separate_claims_are_reported_separately() {
        let findings = check(
            &[("3", "连接杆")],
            "1. 装置包括链接杆。\n2. 所述链接杆为金属。",
        );
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn windows_with_punctuation_or_digits_are_skipped() {
        // The only three-char windows spanning 杆。固 etc. contain
        // punctuation and must not be read.
        let findings = check(&[("3", "连接杆")], "1. 固定槽(1)，支撑架。");
        assert!(findings.is_empty());
    }

    #[test]
    fn single_character_descriptions_are_ignored() {
        let findings = check(&[("7", "槽")], "1. 装置包括凹糟。");
        assert!(findings.is_empty());
    }

    #[test]
    fn provider_failure_propagates() {
        struct Failing;
        impl PhoneticProvider for Failing {
            fn readings_of(&self, _: &str, _: bool) -> Result<Vec<String>, Error> {
                Err(Error::Unavailable("down".to_string()))
            }
        }

        let result = run(
            &ClaimDocument::new(segment("1. 装置。")),
            &legend(&[("3", "连接杆")]),
            &Failing,
        );
        assert!(result.is_err());
    }
}
