//! Claim segmentation and citation-phrase extraction.
//!
//! A claims document is a sequence of numbered clauses. A new claim begins on
//! every line starting with a number followed by `.`、`、`、`．` or
//! whitespace; all following lines belong to that claim until the next
//! claim-start line. Citation phrases (`根据权利要求1所述…`) are scanned out
//! of each claim body and their numeral lists expanded, both here for the
//! claim's parent set and on demand for the citation checker.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::domain::claim::Claim;

/// A line that opens a new claim: leading numeral, separator, body.
static CLAIM_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)[.、．\s]\s*(.*)$").expect("static pattern is valid")
});

/// A citation phrase: an optional `根据`/`如` lead-in, the numeral list
/// (`1`, `1、3`, `1-3和5`, `2至4`), optional `中任一项` filler and an optional
/// `所述`/`的` tail. A match with neither the lead-in nor the tail is a bare
/// mention of the words 权利要求, not a citation.
static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(根据|如)?\s*权利要求\s*([0-9]+(?:\s*[、,，和或至~\-]\s*[0-9]+)*)(?:\s*中?任[一意]一?项)?\s*(所述|的)?",
    )
    .expect("static pattern is valid")
});

/// One numeral or one inclusive range inside a citation list.
static ID_OR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(?:\s*[至~\-]\s*([0-9]+))?").expect("static pattern is valid")
});

/// A single citation phrase found in a claim body.
///
/// `ids` preserves order and duplicates as written, so the duplicate-citation
/// checker can see repeats that the claim's deduplicated parent set hides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationPhrase {
    /// The numeral-list text as matched.
    pub raw: String,
    /// The expanded claim ids, in written order, duplicates preserved.
    pub ids: Vec<u32>,
}

/// Splits a claims document into its claims.
///
/// Lines before the first claim-start line are ignored. Segmentation itself
/// never fails; structural problems are the checkers' concern.
#[must_use]
#[tracing::instrument(skip_all)]
pub fn segment(text: &str) -> Vec<Claim> {
    struct Pending {
        id: u32,
        lines: Vec<String>,
        first_line: usize,
        last_line: usize,
    }

    impl Pending {
        fn finish(self) -> Claim {
            let full_text = self.lines.join("\n").trim().to_string();
            let parent_ids: BTreeSet<u32> = citation_phrases(&full_text)
                .into_iter()
                .flat_map(|phrase| phrase.ids)
                .collect();
            Claim::new(
                self.id,
                full_text,
                self.first_line..=self.last_line,
                parent_ids,
            )
        }
    }

    let mut claims = Vec::new();
    let mut pending: Option<Pending> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        let start = CLAIM_START
            .captures(line)
            .and_then(|caps| Some((caps[1].parse::<u32>().ok()?, caps[2].trim().to_string())));

        if let Some((id, rest)) = start {
            if let Some(done) = pending.take() {
                claims.push(done.finish());
            }
            pending = Some(Pending {
                id,
                lines: if rest.is_empty() { Vec::new() } else { vec![rest] },
                first_line: line_no,
                last_line: line_no,
            });
        } else if let Some(current) = pending.as_mut() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                current.lines.push(trimmed.to_string());
                current.last_line = line_no;
            }
        }
    }

    if let Some(done) = pending.take() {
        claims.push(done.finish());
    }

    claims
}

/// Extracts every citation phrase from a claim body.
///
/// A numeral list is only a citation when it is anchored by the `根据`/`如`
/// lead-in or the `所述`/`的` tail; comparative prose such as
/// `不同于权利要求9中任一项` cites nothing.
#[must_use]
pub fn citation_phrases(text: &str) -> Vec<CitationPhrase> {
    CITATION
        .captures_iter(text)
        .filter(|caps| caps.get(1).is_some() || caps.get(3).is_some())
        .map(|caps| {
            let raw = caps[2].to_string();
            let ids = expand_list(&raw);
            CitationPhrase { raw, ids }
        })
        .collect()
}

/// Expands a numeral-list string into individual claim ids.
///
/// Ranges (`1-3`, `2至4`, `5~7`) are inclusive and only expanded when the low
/// end does not exceed the high end; otherwise both endpoints are kept as
/// individual ids.
fn expand_list(list: &str) -> Vec<u32> {
    let mut ids = Vec::new();

    for caps in ID_OR_RANGE.captures_iter(list) {
        let Ok(low) = caps[1].parse::<u32>() else {
            continue;
        };
        match caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) {
            Some(high) if low <= high => ids.extend(low..=high),
            Some(high) => {
                ids.push(low);
                ids.push(high);
            }
            None => ids.push(low),
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const SAMPLE: &str = "1. 一种装置，包括固定槽。\n2. 根据权利要求1所述的装置，其中所述固定槽为金属。\n3. 根据权利要求5所述的装置。";

    #[test]
    fn segments_numbered_claims() {
        let claims = segment(SAMPLE);
        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].id(), 1);
        assert_eq!(claims[0].text(), "一种装置，包括固定槽。");
        assert_eq!(claims[1].parent_ids().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(claims[2].parent_ids().iter().copied().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn continuation_lines_join_the_current_claim() {
        let text = "1. 一种装置，\n包括固定槽。\n\n2、根据权利要求1所述的装置。";
        let claims = segment(text);
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].text(), "一种装置，\n包括固定槽。");
        assert_eq!(claims[0].line_span(), &(1..=2));
        assert_eq!(claims[1].line_span(), &(4..=4));
    }

    #[test]
    fn text_before_the_first_claim_is_ignored() {
        let claims = segment("权利要求书\n\n1. 一种装置。");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].id(), 1);
    }

    #[test]
    fn empty_input_yields_no_claims() {
        assert!(segment("").is_empty());
        assert!(segment("   \n  ").is_empty());
    }

    #[test_case("1", &[1]; "single")]
    #[test_case("1、3", &[1, 3]; "dunhao list")]
    #[test_case("1,3，5", &[1, 3, 5]; "comma list")]
    #[test_case("1和2", &[1, 2]; "he conjunction")]
    #[test_case("1或2", &[1, 2]; "huo conjunction")]
    #[test_case("1至3", &[1, 2, 3]; "zhi range")]
    #[test_case("1-3", &[1, 2, 3]; "dash range")]
    #[test_case("5~7", &[5, 6, 7]; "tilde range")]
    #[test_case("1-3和5", &[1, 2, 3, 5]; "range then single")]
    #[test_case("3-1", &[3, 1]; "inverted range kept as endpoints")]
    fn expands_numeral_lists(list: &str, expected: &[u32]) {
        assert_eq!(expand_list(list), expected);
    }

    #[test]
    fn bare_mention_is_not_a_citation() {
        let phrases = citation_phrases("其保护范围不同于权利要求9中任一项。");
        assert!(phrases.is_empty());

        let claims = segment("2. 一种方法，其保护范围不同于权利要求9中任一项。");
        assert!(claims[0].parent_ids().is_empty());
    }

    #[test]
    fn tail_alone_anchors_a_citation() {
        let phrases = citation_phrases("权利要求1-3中任一项所述的装置");
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].ids, vec![1, 2, 3]);
    }

    #[test]
    fn citation_phrases_preserve_duplicates() {
        let phrases = citation_phrases("根据权利要求1、1所述的装置，如权利要求2所述。");
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].ids, vec![1, 1]);
        assert_eq!(phrases[1].ids, vec![2]);
    }

    #[test]
    fn parent_ids_are_deduplicated_across_phrases() {
        let claims = segment("3. 根据权利要求1、1所述，又如权利要求1至2所述的装置。");
        let parents: Vec<u32> = claims[0].parent_ids().iter().copied().collect();
        assert_eq!(parents, vec![1, 2]);
    }
}
