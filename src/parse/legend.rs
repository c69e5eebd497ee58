//! Parsing of figure-legend text.
//!
//! A legend is a list of numeral/description pairs such as
//! `1、固定槽；2、支撑架；3、连接杆。`. Parsing validates the overall format
//! and a handful of common copy/paste mistakes before building a
//! [`LegendMap`], returning a structured [`Diagnostic`] with suggested
//! corrections when it cannot.

use std::{fmt, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

use crate::{
    domain::{
        legend::{LegendEntry, LegendMap},
        numeral::{NUMERAL_PATTERN, Numeral},
    },
    report::{Finding, FindingKind},
};

/// A successfully parsed legend.
#[derive(Debug, Default)]
pub struct ParsedLegend {
    /// The validated description→numeral mapping, in source order.
    pub map: LegendMap,
    /// Non-fatal advisories, currently only overlapping-description
    /// warnings. Annotation still proceeds (longest match first).
    pub warnings: Vec<Finding>,
}

/// An offending legend fragment together with its suggested correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The fragment as it appears in the input.
    pub original: String,
    /// The suggested corrected form.
    pub corrected: String,
}

/// A description shared by more than one numeral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The duplicated description.
    pub description: String,
    /// Every numeral carrying this description, in source order.
    pub numerals: Vec<String>,
}

/// Fatal legend-format diagnostics.
///
/// Each variant corresponds to one blocking input-format problem; the
/// [`Diagnostic::detail`] rendering includes the offending fragments and
/// suggested corrections for display as a blocking dialog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Diagnostic {
    /// The input does not end with the sentence terminator `。`.
    #[error("附图标记说明的末尾缺少句号")]
    PunctuationMissing {
        /// The input as given.
        text: String,
        /// The input with the terminator appended.
        suggestion: String,
    },

    /// None of the supported numeral/description grammars matched.
    #[error("未能识别附图标记格式")]
    FormatUnrecognized,

    /// A numeral is immediately followed by its description with no `、`.
    #[error("检测到缺失顿号的标号")]
    DunhaoMissing {
        /// Each offending fragment with its corrected form.
        fragments: Vec<Fragment>,
    },

    /// Two numeral/description pairs appear in one segment with no `；`
    /// between them.
    #[error("检测到标号之间缺失分号")]
    SemicolonMissing {
        /// Each offending fragment with its corrected form.
        fragments: Vec<Fragment>,
    },

    /// The same description is assigned to more than one numeral.
    #[error("检测到重复的标记名称")]
    DuplicateDescription {
        /// Every duplicated description with all of its numerals.
        groups: Vec<DuplicateGroup>,
    },
}

impl Diagnostic {
    /// A short dialog title for this diagnostic.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::PunctuationMissing { .. } => "句号缺失",
            Self::FormatUnrecognized => "格式错误",
            Self::DunhaoMissing { .. } => "顿号缺失",
            Self::SemicolonMissing { .. } => "分号缺失",
            Self::DuplicateDescription { .. } => "重复标记名称",
        }
    }

    /// The full dialog body: explanation, offending fragments and suggested
    /// corrections.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::PunctuationMissing { text, suggestion } => format!(
                "附图标记说明的末尾缺少句号，这可能表示复制不完整。\n\
                 请确保完整复制了所有附图标记，并在末尾添加句号。\n\
                 当前文本：{text}\n建议格式：{suggestion}"
            ),
            Self::FormatUnrecognized => {
                "未能识别附图标记格式，请检查输入。\n正确格式示例：1、固定槽；2、支撑架；3、连接杆。"
                    .to_string()
            }
            Self::DunhaoMissing { fragments } => {
                let mut detail = String::from("检测到以下标号可能缺失顿号：\n");
                append_fragments(&mut detail, fragments);
                detail
            }
            Self::SemicolonMissing { fragments } => {
                let mut detail =
                    String::from("检测到以下标号之间可能缺失分号，请在每个标号描述后添加分号：\n");
                append_fragments(&mut detail, fragments);
                detail
            }
            Self::DuplicateDescription { groups } => {
                let mut detail = String::from(
                    "检测到以下标记名称完全相同，请修改标记名称，确保每个标记都有唯一的名称：\n",
                );
                for group in groups {
                    let numerals = group
                        .numerals
                        .iter()
                        .map(|n| format!("({n})"))
                        .collect::<Vec<_>>()
                        .join("、");
                    let _ = fmt::Write::write_fmt(
                        &mut detail,
                        format_args!("  \"{}\" 对应编号: {numerals}\n", group.description),
                    );
                }
                detail
            }
        }
    }
}

fn append_fragments(detail: &mut String, fragments: &[Fragment]) {
    for fragment in fragments {
        let _ = fmt::Write::write_fmt(
            detail,
            format_args!("  {} → {}\n", fragment.original, fragment.corrected),
        );
    }
}

/// The candidate pair grammars, tried in fixed priority order. The first
/// grammar producing at least one match wins outright; grammars are never
/// combined.
static PAIR_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    let build = |separator: &str| {
        Regex::new(&format!("({NUMERAL_PATTERN}){separator}([^；;]+)"))
            .expect("static pattern is valid")
    };
    [build("、"), build("-"), build("："), build(r"\.")]
});

/// A numeral immediately followed by non-separator text (`2支撑架`).
static MISSING_DUNHAO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "({NUMERAL_PATTERN})([^0-9A-Za-z、\\-：.;；。\\s]+)"
    ))
    .expect("static pattern is valid")
});

/// Two pairs inside one segment with no `；` between them
/// (`1、固定槽2、支撑架`).
static MISSING_SEMICOLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "({NUMERAL_PATTERN}[、\\-：.][^；;。0-9]+)({NUMERAL_PATTERN}[、\\-：.])"
    ))
    .expect("static pattern is valid")
});

/// Parses raw legend text into a validated [`ParsedLegend`].
///
/// Overlapping (substring-contained) descriptions are non-fatal and reported
/// through [`ParsedLegend::warnings`]; every other format problem aborts the
/// parse with a [`Diagnostic`]. A failed parse never yields a partial map.
///
/// # Errors
///
/// Returns a [`Diagnostic`] describing the first blocking problem found, in
/// this order: missing terminator, unrecognized format, missing `、`,
/// missing `；`, duplicate descriptions.
#[tracing::instrument(skip_all)]
pub fn parse(raw: &str) -> Result<ParsedLegend, Diagnostic> {
    let text = raw.trim();

    if !text.ends_with('。') {
        return Err(Diagnostic::PunctuationMissing {
            text: text.to_string(),
            suggestion: format!("{text}。"),
        });
    }
    let clean = text.strip_suffix('。').unwrap_or(text);

    let marks = extract_marks(clean).ok_or(Diagnostic::FormatUnrecognized)?;

    check_missing_dunhao(clean)?;
    check_missing_semicolon(clean)?;
    check_duplicates(&marks)?;

    let warnings = overlap_warnings(&marks);

    let mut map = LegendMap::with_capacity(marks.len());
    for (numeral, description) in marks {
        let numeral = Numeral::new(numeral).map_err(|_| Diagnostic::FormatUnrecognized)?;
        let Ok(description) = NonEmptyString::new(description) else {
            continue;
        };
        map.push(LegendEntry::new(numeral, description));
    }

    if map.is_empty() {
        return Err(Diagnostic::FormatUnrecognized);
    }

    Ok(ParsedLegend { map, warnings })
}

/// Extracts (numeral, description) pairs using the first matching grammar.
///
/// Descriptions are trimmed and stripped of one trailing punctuation mark;
/// pairs whose description is then empty are dropped.
fn extract_marks(clean: &str) -> Option<Vec<(String, String)>> {
    for pattern in PAIR_PATTERNS.iter() {
        let marks: Vec<(String, String)> = pattern
            .captures_iter(clean)
            .filter_map(|caps| {
                let numeral = caps[1].to_string();
                let raw = caps[2].trim();
                let description = raw
                    .strip_suffix(['。', '，', '；', ';'])
                    .unwrap_or(raw)
                    .trim()
                    .to_string();
                (!description.is_empty()).then_some((numeral, description))
            })
            .collect();

        if !marks.is_empty() {
            return Some(marks);
        }
    }
    None
}

fn check_missing_dunhao(clean: &str) -> Result<(), Diagnostic> {
    let fragments: Vec<Fragment> = MISSING_DUNHAO
        .captures_iter(clean)
        .map(|caps| Fragment {
            original: format!("{}{}", &caps[1], &caps[2]),
            corrected: format!("{}、{}", &caps[1], &caps[2]),
        })
        .collect();

    if fragments.is_empty() {
        Ok(())
    } else {
        Err(Diagnostic::DunhaoMissing { fragments })
    }
}

fn check_missing_semicolon(clean: &str) -> Result<(), Diagnostic> {
    let mut fragments = Vec::new();

    for segment in clean.split(['；', ';', '。']) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        for caps in MISSING_SEMICOLON.captures_iter(segment) {
            fragments.push(Fragment {
                original: caps[0].to_string(),
                corrected: format!("{}；{}", &caps[1], &caps[2]),
            });
        }
    }

    if fragments.is_empty() {
        Ok(())
    } else {
        Err(Diagnostic::SemicolonMissing { fragments })
    }
}

fn check_duplicates(marks: &[(String, String)]) -> Result<(), Diagnostic> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (numeral, description) in marks {
        if let Some(group) = groups.iter_mut().find(|g| &g.description == description) {
            group.numerals.push(numeral.clone());
        } else {
            groups.push(DuplicateGroup {
                description: description.clone(),
                numerals: vec![numeral.clone()],
            });
        }
    }

    groups.retain(|g| g.numerals.len() > 1);
    if groups.is_empty() {
        Ok(())
    } else {
        Err(Diagnostic::DuplicateDescription { groups })
    }
}

/// Detects containment between distinct descriptions.
///
/// Containment is advisory only: annotation resolves such collisions by
/// matching longer descriptions first, but the drafter should still be told
/// the names are ambiguous.
fn overlap_warnings(marks: &[(String, String)]) -> Vec<Finding> {
    let mut warnings = Vec::new();

    for (i, (num_a, desc_a)) in marks.iter().enumerate() {
        for (num_b, desc_b) in &marks[i + 1..] {
            if desc_a == desc_b {
                continue;
            }
            let (shorter, longer) = if desc_a.contains(desc_b.as_str()) {
                ((num_b, desc_b), (num_a, desc_a))
            } else if desc_b.contains(desc_a.as_str()) {
                ((num_a, desc_a), (num_b, desc_b))
            } else {
                continue;
            };
            warnings.push(Finding::new(
                FindingKind::OverlappingDescription,
                None,
                format!(
                    "\"{}\"（{}）被 \"{}\"（{}）包含，标注时将优先匹配较长名称，建议修改名称以明确区分",
                    shorter.1, shorter.0, longer.1, longer.0
                ),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(parsed: &ParsedLegend) -> Vec<(String, String)> {
        parsed
            .map
            .iter()
            .map(|e| (e.numeral().to_string(), e.description().to_string()))
            .collect()
    }

    #[test]
    fn parses_standard_dunhao_format() {
        let parsed = parse("1、固定槽；2、支撑架；3、连接杆。").unwrap();
        assert_eq!(
            entries(&parsed),
            vec![
                ("1".to_string(), "固定槽".to_string()),
                ("2".to_string(), "支撑架".to_string()),
                ("3".to_string(), "连接杆".to_string()),
            ]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn parses_dash_colon_and_dot_formats() {
        for text in [
            "100-基底层；200-电极。",
            "100：基底层；200：电极。",
            "100.基底层；200.电极。",
        ] {
            let parsed = parse(text).unwrap();
            assert_eq!(parsed.map.len(), 2, "failed for {text}");
            assert_eq!(parsed.map.numeral_for("基底层").unwrap().as_str(), "100");
        }
    }

    #[test]
    fn first_matching_grammar_wins_outright() {
        // The 、 grammar matches once, so the - pair is never considered.
        let parsed = parse("1、固定槽；2-支撑架。").unwrap();
        assert_eq!(parsed.map.len(), 1);
        assert!(parsed.map.numeral_for("支撑架").is_none());
    }

    #[test]
    fn alphanumeric_numerals_are_accepted() {
        let parsed = parse("10a、固定槽；10b、支撑架。").unwrap();
        assert_eq!(parsed.map.numeral_for("支撑架").unwrap().as_str(), "10b");
    }

    #[test]
    fn missing_terminator_is_fatal() {
        let err = parse("1、固定槽；2、支撑架").unwrap_err();
        match err {
            Diagnostic::PunctuationMissing { suggestion, .. } => {
                assert_eq!(suggestion, "1、固定槽；2、支撑架。");
            }
            other => panic!("unexpected diagnostic: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_format_is_fatal() {
        assert_eq!(
            parse("固定槽和支撑架。").unwrap_err(),
            Diagnostic::FormatUnrecognized
        );
    }

    #[test]
    fn missing_dunhao_is_detected_with_correction() {
        let err = parse("1、固定槽；2支撑架。").unwrap_err();
        match err {
            Diagnostic::DunhaoMissing { fragments } => {
                assert_eq!(fragments.len(), 1);
                assert_eq!(fragments[0].original, "2支撑架");
                assert_eq!(fragments[0].corrected, "2、支撑架");
            }
            other => panic!("unexpected diagnostic: {other:?}"),
        }
    }

    #[test]
    fn missing_semicolon_is_detected_with_correction() {
        let err = parse("1、固定槽2、支撑架。").unwrap_err();
        match err {
            Diagnostic::SemicolonMissing { fragments } => {
                assert_eq!(fragments.len(), 1);
                assert_eq!(fragments[0].original, "1、固定槽2、");
                assert_eq!(fragments[0].corrected, "1、固定槽；2、");
            }
            other => panic!("unexpected diagnostic: {other:?}"),
        }
    }

    #[test]
    fn duplicate_descriptions_are_fatal_and_list_all_numerals() {
        let err = parse("1、固定槽；2、固定槽；3、连接杆。").unwrap_err();
        match err {
            Diagnostic::DuplicateDescription { groups } => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].description, "固定槽");
                assert_eq!(groups[0].numerals, vec!["1", "2"]);
            }
            other => panic!("unexpected diagnostic: {other:?}"),
        }
    }

    #[test]
    fn overlapping_descriptions_warn_but_parse() {
        let parsed = parse("2、支撑架；5、支撑。").unwrap();
        assert_eq!(parsed.map.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(
            parsed.warnings[0].kind,
            FindingKind::OverlappingDescription
        );
        assert!(parsed.warnings[0].message.contains("支撑架"));
    }

    #[test]
    fn trailing_punctuation_is_stripped_from_descriptions() {
        let parsed = parse("1、固定槽，；2、支撑架。").unwrap();
        assert_eq!(parsed.map.numeral_for("固定槽").unwrap().as_str(), "1");
    }

    #[test]
    fn canonical_output_reparses_identically() {
        let parsed = parse("1、固定槽；2、支撑架；3、连接杆。").unwrap();
        let reparsed = parse(&parsed.map.to_string()).unwrap();
        assert_eq!(entries(&parsed), entries(&reparsed));
    }
}
