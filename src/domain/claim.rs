use std::{collections::BTreeSet, ops::RangeInclusive};

/// A single numbered clause of a patent claims document.
///
/// Claims are created once during segmentation and are immutable thereafter;
/// checkers only ever read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    id: u32,
    full_text: String,
    line_span: RangeInclusive<usize>,
    parent_ids: BTreeSet<u32>,
}

impl Claim {
    /// Creates a claim from its segmented parts.
    #[must_use]
    pub const fn new(
        id: u32,
        full_text: String,
        line_span: RangeInclusive<usize>,
        parent_ids: BTreeSet<u32>,
    ) -> Self {
        Self {
            id,
            full_text,
            line_span,
            parent_ids,
        }
    }

    /// The claim number, parsed from the leading numeral of its first line.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// The claim body with the leading numeral marker removed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.full_text
    }

    /// The 1-based inclusive line range this claim occupied in the input.
    #[must_use]
    pub const fn line_span(&self) -> &RangeInclusive<usize> {
        &self.line_span
    }

    /// The set of claim ids this claim cites, deduplicated.
    #[must_use]
    pub const fn parent_ids(&self) -> &BTreeSet<u32> {
        &self.parent_ids
    }
}
