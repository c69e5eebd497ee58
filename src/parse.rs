//! Input-format parsing: the figure legend and the claims document.

/// Figure-legend parsing and diagnostics.
pub mod legend;
pub use legend::{Diagnostic, ParsedLegend};

/// Claim segmentation and citation-phrase extraction.
pub mod claims;
pub use claims::{CitationPhrase, segment};
