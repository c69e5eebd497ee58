use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated reference numeral from a figure legend.
///
/// Numerals follow a closed alphanumeric grammar: a leading ASCII digit
/// followed by any number of ASCII alphanumerics (`100`, `12a`, `3B`).
/// The same grammar is used everywhere numerals are matched in text, so
/// legend parsing, annotation and the consistency checker agree on what a
/// numeral is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeral(NonEmptyString);

/// The regular-expression fragment matching a reference numeral.
///
/// Embed this in larger patterns rather than re-stating the grammar.
pub const NUMERAL_PATTERN: &str = "[0-9][0-9A-Za-z]*";

impl Numeral {
    /// Creates a new `Numeral` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNumeralError`] if the string is empty, does not start
    /// with an ASCII digit, or contains characters other than ASCII
    /// alphanumerics.
    pub fn new(s: String) -> Result<Self, InvalidNumeralError> {
        let mut chars = s.chars();
        let well_formed = chars
            .next()
            .is_some_and(|first| first.is_ascii_digit() && chars.all(|c| c.is_ascii_alphanumeric()));

        if !well_formed {
            return Err(InvalidNumeralError(s));
        }

        let non_empty = NonEmptyString::new(s.clone()).map_err(|_| InvalidNumeralError(s))?;
        Ok(Self(non_empty))
    }

    /// Returns the numeral as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Numeral {
    type Error = InvalidNumeralError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Numeral {
    type Error = InvalidNumeralError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for Numeral {
    type Err = InvalidNumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Numeral {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Numeral {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string does not match the numeral grammar.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid numeral '{0}': expected a leading digit followed by ASCII alphanumerics")]
pub struct InvalidNumeralError(String);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("1")]
    #[test_case("100")]
    #[test_case("12a")]
    #[test_case("3B7")]
    fn accepts_valid_numerals(input: &str) {
        let numeral = Numeral::new(input.to_string()).unwrap();
        assert_eq!(numeral.as_str(), input);
    }

    #[test_case(""; "empty")]
    #[test_case("a1"; "leading letter")]
    #[test_case("10-1"; "embedded dash")]
    #[test_case("１０"; "full width digits")]
    #[test_case("10 "; "trailing space")]
    fn rejects_invalid_numerals(input: &str) {
        assert!(Numeral::new(input.to_string()).is_err());
    }

    #[test]
    fn display_round_trips() {
        let numeral: Numeral = "12a".parse().unwrap();
        assert_eq!(numeral.to_string(), "12a");
        assert_eq!(numeral.to_string().parse::<Numeral>().unwrap(), numeral);
    }

    #[test]
    fn pattern_agrees_with_validation() {
        let re = regex::Regex::new(&format!("^{NUMERAL_PATTERN}$")).unwrap();
        for candidate in ["1", "100", "12a", "a1", "", "10-1"] {
            assert_eq!(
                re.is_match(candidate),
                Numeral::new(candidate.to_string()).is_ok(),
                "grammar mismatch for '{candidate}'"
            );
        }
    }
}
