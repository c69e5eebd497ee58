//! Phonetic-reading lookup for the homophone-typo checker.
//!
//! The checker only ever sees the [`PhoneticProvider`] trait; the shipped
//! implementation is backed by the `pinyin` crate's embedded reading table.
//! Acquisition is lazy and fallible by contract: a provider that cannot
//! deliver readings degrades the report (one resource-unavailable warning)
//! instead of aborting it.

use std::sync::OnceLock;

use pinyin::{ToPinyin, ToPinyinMulti};

/// The maximum number of heteronym reading combinations expanded per text.
pub const MAX_EXPANSIONS: usize = 128;

/// Errors from a phonetic provider.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The reading resource could not be acquired or answered.
    #[error("拼音资源不可用: {0}")]
    Unavailable(String),
}

/// A source of phonetic readings for Chinese text.
///
/// A reading is the space-joined per-character transliteration of the whole
/// text (e.g. `固定槽` → `"gu ding cao"`). With `all_heteronyms` set, every
/// combination of per-character alternative readings is returned, capped at
/// [`MAX_EXPANSIONS`]; otherwise a single default reading.
pub trait PhoneticProvider {
    /// All phonetic readings of `text`.
    ///
    /// Characters without a known reading (Latin letters, digits) read as
    /// themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] when the reading resource cannot
    /// answer.
    fn readings_of(&self, text: &str, all_heteronyms: bool) -> Result<Vec<String>, Error>;
}

/// The `pinyin`-crate-backed provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinProvider;

impl PhoneticProvider for PinyinProvider {
    fn readings_of(&self, text: &str, all_heteronyms: bool) -> Result<Vec<String>, Error> {
        let mut variants: Vec<String> = vec![String::new()];

        for ch in text.chars() {
            let readings = char_readings(ch, all_heteronyms);

            let mut extended = Vec::with_capacity(variants.len() * readings.len());
            'outer: for variant in &variants {
                for reading in &readings {
                    if extended.len() >= MAX_EXPANSIONS {
                        break 'outer;
                    }
                    let mut next = variant.clone();
                    if !next.is_empty() {
                        next.push(' ');
                    }
                    next.push_str(reading);
                    extended.push(next);
                }
            }
            variants = extended;
        }

        Ok(variants)
    }
}

fn char_readings(ch: char, all_heteronyms: bool) -> Vec<String> {
    let known: Option<Vec<String>> = if all_heteronyms {
        ch.to_pinyin_multi()
            .map(|multi| multi.into_iter().map(|p| p.plain().to_string()).collect())
    } else {
        ch.to_pinyin().map(|p| vec![p.plain().to_string()])
    };
    known.unwrap_or_else(|| vec![ch.to_string()])
}

static PROVIDER: OnceLock<PinyinProvider> = OnceLock::new();

/// Lazily acquires the process-wide [`PinyinProvider`].
///
/// The provider is probed with a known character on first use so a broken
/// reading table surfaces here, at the acquisition point, rather than deep
/// inside a check run.
///
/// # Errors
///
/// Returns [`Error::Unavailable`] when the reading table cannot answer the
/// probe.
pub fn acquire() -> Result<&'static PinyinProvider, Error> {
    let provider = PROVIDER.get_or_init(PinyinProvider::default);
    let probe = provider.readings_of("的", false)?;
    if probe.is_empty() {
        return Err(Error::Unavailable("empty probe reading".to_string()));
    }
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reading_is_single() {
        let readings = PinyinProvider.readings_of("固定槽", false).unwrap();
        assert_eq!(readings, vec!["gu ding cao".to_string()]);
    }

    #[test]
    fn heteronyms_expand_the_cross_product() {
        // 长 reads both chang and zhang.
        let readings = PinyinProvider.readings_of("长度", true).unwrap();
        assert!(readings.contains(&"chang du".to_string()));
        assert!(readings.contains(&"zhang du".to_string()));
    }

    #[test]
    fn unknown_characters_read_as_themselves() {
        let readings = PinyinProvider.readings_of("a槽", false).unwrap();
        assert_eq!(readings, vec!["a cao".to_string()]);
    }

    #[test]
    fn expansion_is_capped() {
        // Eight heteronym-rich characters would otherwise explode.
        let readings = PinyinProvider.readings_of("长长长长长长长长", true).unwrap();
        assert!(readings.len() <= MAX_EXPANSIONS);
    }

    #[test]
    fn acquire_returns_a_working_provider() {
        let provider = acquire().unwrap();
        assert!(!provider.readings_of("槽", false).unwrap().is_empty());
    }
}
