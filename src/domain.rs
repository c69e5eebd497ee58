//! Domain models for patent-document analysis.
//!
//! This module contains the core domain types: validated reference numerals,
//! the figure legend, claims and the claim-document citation graph, and tool
//! configuration.

/// Validated reference-numeral token.
pub mod numeral;
pub use numeral::Numeral;

/// The figure legend: numeral/description pairs.
pub mod legend;
pub use legend::{LegendEntry, LegendMap};

/// A single claim of a claims document.
pub mod claim;
pub use claim::Claim;

/// The claims document and its citation graph.
pub mod document;
pub use document::ClaimDocument;

mod config;
pub use config::{CONFIG_FILE_NAME, Config};
