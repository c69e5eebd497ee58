//! Chinese patent-draft annotation and checking.
//!
//! Given a figure legend (附图标记说明) and claim or description text, this
//! crate inserts reference-numeral annotations and runs a battery of
//! structural and linguistic checks over the claims: citation validity,
//! punctuation, numbering continuity, antecedent basis, numeral consistency
//! and homophone-typo detection.

pub mod domain;
pub use domain::{Claim, ClaimDocument, Config, LegendEntry, LegendMap, Numeral};

/// Legend and claims-document parsing.
pub mod parse;

/// Reference-numeral annotation.
pub mod annotate;

/// The checker suite.
pub mod check;
pub use check::{CheckContext, CheckKind};

/// Phonetic readings for the typo check.
pub mod phonetic;

/// Findings and the aggregated report.
pub mod report;
pub use report::{Finding, FindingKind, Report, Severity};
