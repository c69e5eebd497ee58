//! The figure-legend mapping from component descriptions to reference
//! numerals.
//!
//! A [`LegendMap`] is an ordered collection of [`LegendEntry`] values with a
//! description→numeral lookup. Matching against free text must always
//! consider longer descriptions first, so that a short description cannot
//! shadow a longer one that contains it ("支撑" must not fire inside
//! "支撑架").

use std::{collections::HashMap, fmt};

use non_empty_string::NonEmptyString;

use super::numeral::Numeral;

/// A single legend entry: a reference numeral and the component description
/// it labels.
///
/// Descriptions are non-empty and stored with trailing punctuation already
/// stripped (the parser's responsibility).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    numeral: Numeral,
    description: NonEmptyString,
}

impl LegendEntry {
    /// Create an entry from pre-validated parts.
    #[must_use]
    pub const fn new(numeral: Numeral, description: NonEmptyString) -> Self {
        Self {
            numeral,
            description,
        }
    }

    /// The reference numeral.
    #[must_use]
    pub const fn numeral(&self) -> &Numeral {
        &self.numeral
    }

    /// The component description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// An ordered collection of legend entries with description lookup.
#[derive(Debug, Clone, Default)]
pub struct LegendMap {
    entries: Vec<LegendEntry>,
    by_description: HashMap<String, usize>,
}

impl LegendMap {
    /// Creates an empty map with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            by_description: HashMap::with_capacity(capacity),
        }
    }

    /// Appends an entry, preserving insertion order.
    ///
    /// If an entry with the same description is already present the new entry
    /// is discarded; the parser rejects duplicate descriptions before
    /// construction, so this is only reachable through direct use of the API.
    pub fn push(&mut self, entry: LegendEntry) {
        if self.by_description.contains_key(entry.description()) {
            return;
        }
        self.by_description
            .insert(entry.description().to_string(), self.entries.len());
        self.entries.push(entry);
    }

    /// Looks up the numeral for an exact description.
    #[must_use]
    pub fn numeral_for(&self, description: &str) -> Option<&Numeral> {
        self.by_description
            .get(description)
            .map(|&idx| self.entries[idx].numeral())
    }

    /// Returns `true` if the map contains an entry with this exact
    /// description.
    #[must_use]
    pub fn contains_description(&self, description: &str) -> bool {
        self.by_description.contains_key(description)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter()
    }

    /// Returns entries ordered by description length, longest first.
    ///
    /// Ties keep insertion order. This is the iteration order every matching
    /// pass must use.
    #[must_use]
    pub fn entries_longest_first(&self) -> Vec<&LegendEntry> {
        let mut entries: Vec<&LegendEntry> = self.entries.iter().collect();
        entries.sort_by_key(|e| std::cmp::Reverse(e.description().chars().count()));
        entries
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a LegendMap {
    type Item = &'a LegendEntry;
    type IntoIter = std::slice::Iter<'a, LegendEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for LegendMap {
    /// Renders the canonical legend form: `1、固定槽；2、支撑架。`
    ///
    /// Parsing this output reproduces the map exactly.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "；")?;
            }
            write!(f, "{}、{}", entry.numeral(), entry.description())?;
        }
        write!(f, "。")
    }
}
