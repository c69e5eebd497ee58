//! Reference-numeral annotation.
//!
//! Given a parsed legend, [`annotate`] inserts each entry's numeral next to
//! every occurrence of its description in free text. All descriptions are
//! combined into a single alternation pattern ordered longest-first and
//! applied in one pass, so a short description can never re-match inside the
//! replacement of a longer one.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::legend::LegendMap;

/// The kind of patent document being annotated.
///
/// Claims documents annotate as `描述 (标号)`; description documents annotate
/// as `描述 标号`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// 权利要求书 — the claims document.
    #[default]
    Claims,
    /// 说明书 — the description document.
    Description,
}

/// Formatting options for annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Omit the space between description and numeral.
    pub smart_spacing: bool,
    /// Match descriptions case-sensitively (relevant for Latin-script
    /// descriptions; the default is case-insensitive).
    pub case_sensitive: bool,
    /// Apply the doubled-character/whitespace auto-correct pre-pass before
    /// annotating.
    pub auto_correct: bool,
}

/// The result of an annotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    /// The annotated text.
    pub text: String,
    /// The number of substitutions performed.
    pub applied: usize,
}

/// Errors produced while annotating.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The combined description pattern could not be compiled (in practice
    /// only reachable by exceeding the regex size limit).
    #[error("failed to build the annotation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Doubled-character slips the auto-correct pre-pass collapses.
const DOUBLED_WORDS: [(&str, &str); 8] = [
    ("的的", "的"),
    ("了了", "了"),
    ("在在", "在"),
    ("是是", "是"),
    ("有有", "有"),
    ("与与", "与"),
    ("及及", "及"),
    ("和和", "和"),
];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

/// Collapses a fixed list of doubled-character typos and runs of whitespace.
#[must_use]
pub fn auto_correct(text: &str) -> String {
    let mut corrected = text.to_string();
    for (pattern, replacement) in DOUBLED_WORDS {
        corrected = corrected.replace(pattern, replacement);
    }
    WHITESPACE_RUN.replace_all(&corrected, " ").into_owned()
}

/// Annotates `text` with the numerals of `legend`.
///
/// Matching is case-insensitive unless [`Options::case_sensitive`] is set,
/// and always resolves overlapping candidates longest-first. The returned
/// [`Annotated::applied`] equals the number of non-overlapping matches
/// replaced.
///
/// # Errors
///
/// Returns [`Error::Pattern`] if the combined description pattern cannot be
/// compiled.
#[tracing::instrument(skip_all, fields(entries = legend.len(), ?doc_type))]
pub fn annotate(
    text: &str,
    legend: &LegendMap,
    doc_type: DocType,
    options: Options,
) -> Result<Annotated, Error> {
    let source = if options.auto_correct {
        auto_correct(text)
    } else {
        text.to_string()
    };

    if legend.is_empty() {
        return Ok(Annotated {
            text: source,
            applied: 0,
        });
    }

    let ordered = legend.entries_longest_first();

    let alternation = ordered
        .iter()
        .map(|entry| regex::escape(entry.description()))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = if options.case_sensitive {
        alternation
    } else {
        format!("(?i){alternation}")
    };
    let re = Regex::new(&pattern)?;

    let lookup: HashMap<String, &str> = ordered
        .iter()
        .map(|entry| {
            let key = if options.case_sensitive {
                entry.description().to_string()
            } else {
                entry.description().to_lowercase()
            };
            (key, entry.numeral().as_str())
        })
        .collect();

    let mut applied = 0;
    let annotated = re.replace_all(&source, |caps: &regex::Captures| {
        let matched = &caps[0];
        let key = if options.case_sensitive {
            matched.to_string()
        } else {
            matched.to_lowercase()
        };
        lookup.get(key.as_str()).map_or_else(
            || matched.to_string(),
            |numeral| {
                applied += 1;
                format_annotation(matched, numeral, doc_type, options.smart_spacing)
            },
        )
    });

    Ok(Annotated {
        text: annotated.into_owned(),
        applied,
    })
}

fn format_annotation(matched: &str, numeral: &str, doc_type: DocType, smart: bool) -> String {
    match (doc_type, smart) {
        (DocType::Claims, true) => format!("{matched}({numeral})"),
        (DocType::Claims, false) => format!("{matched} ({numeral})"),
        (DocType::Description, true) => format!("{matched}{numeral}"),
        (DocType::Description, false) => format!("{matched} {numeral}"),
    }
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;
    use test_case::test_case;

    use super::*;
    use crate::domain::legend::LegendEntry;

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

    #[test_case(DocType::Claims, false, "基底层 (100)上设有电极"; "claims spaced")]
    #[test_case(DocType::Claims, true, "基底层(100)上设有电极"; "claims smart")]
    #[test_case(DocType::Description, false, "基底层 100上设有电极"; "description spaced")]
    #[test_case(DocType::Description, true, "基底层100上设有电极"; "description smart")]
    fn formats_by_doc_type(doc_type: DocType, smart_spacing: bool, expected: &str) {
        let legend = legend(&[("100", "基底层")]);
        let options = Options {
            smart_spacing,
            ..Options::default()
        };
        let result = annotate("基底层上设有电极", &legend, doc_type, options).unwrap();
        assert_eq!(result.text, expected);
        assert_eq!(result.applied, 1);
    }

    #[test]
    fn longest_description_wins() {
        let legend = legend(&[("2", "支撑架"), ("5", "支撑")]);
        let result = annotate(
            "支撑架很牢固",
            &legend,
            DocType::Claims,
            Options {
                smart_spacing: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(result.text, "支撑架(2)很牢固");
        assert_eq!(result.applied, 1);
    }

    #[test]
    fn single_pass_does_not_reannotate_replacements() {
        // "底" alone must not fire inside the replacement of "基底层".
        let legend = legend(&[("100", "基底层"), ("7", "底")]);
        let result = annotate(
            "基底层之下是底",
            &legend,
            DocType::Claims,
            Options {
                smart_spacing: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(result.text, "基底层(100)之下是底(7)");
        assert_eq!(result.applied, 2);
    }

    #[test]
    fn counts_every_substitution() {
        let legend = legend(&[("1", "固定槽")]);
        let result = annotate(
            "固定槽连接固定槽",
            &legend,
            DocType::Description,
            Options {
                smart_spacing: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(result.text, "固定槽1连接固定槽1");
        assert_eq!(result.applied, 2);
    }

    #[test]
    fn case_insensitive_by_default() {
        let legend = legend(&[("3", "LED")]);
        let result = annotate(
            "led模块",
            &legend,
            DocType::Claims,
            Options {
                smart_spacing: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(result.text, "led(3)模块");
        assert_eq!(result.applied, 1);
    }

    #[test]
    fn case_sensitive_requires_exact_case() {
        let legend = legend(&[("3", "LED")]);
        let result = annotate(
            "led模块与LED模块",
            &legend,
            DocType::Claims,
            Options {
                smart_spacing: true,
                case_sensitive: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(result.text, "led模块与LED(3)模块");
        assert_eq!(result.applied, 1);
    }

    #[test]
    fn auto_correct_runs_before_annotation() {
        let legend = legend(&[("1", "固定槽")]);
        let result = annotate(
            "所述的的固定槽  很牢固",
            &legend,
            DocType::Claims,
            Options {
                smart_spacing: true,
                auto_correct: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(result.text, "所述的固定槽(1) 很牢固");
    }

    #[test]
    fn empty_legend_is_a_no_op() {
        let result = annotate(
            "基底层",
            &LegendMap::default(),
            DocType::Claims,
            Options::default(),
        )
        .unwrap();
        assert_eq!(result.text, "基底层");
        assert_eq!(result.applied, 0);
    }

    #[test]
    fn auto_correct_collapses_doubles_and_whitespace() {
        assert_eq!(auto_correct("所述的的装置  与与底座"), "所述的装置 与底座");
    }
}
