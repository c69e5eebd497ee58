use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    annotate::{DocType, Options},
    check::CheckKind,
};

/// The default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".patlint.toml";

/// Tool configuration.
///
/// Holds the default document type, annotation formatting options and check
/// selection. Command-line flags override every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The document type annotated and checked by default.
    pub doc_type: DocType,

    /// Omit the space between description and numeral when annotating.
    pub smart_spacing: bool,

    /// Match descriptions case-sensitively when annotating.
    pub case_sensitive: bool,

    /// Apply the doubled-character auto-correct pre-pass when annotating.
    pub auto_correct: bool,

    /// The checks run by default.
    ///
    /// An empty list means every check applicable to the supplied inputs.
    pub checks: Vec<CheckKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            doc_type: DocType::default(),
            smart_spacing: false,
            case_sensitive: false,
            auto_correct: false,
            checks: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The annotation options configured here.
    #[must_use]
    pub const fn options(&self) -> Options {
        Options {
            smart_spacing: self.smart_spacing,
            case_sensitive: self.case_sensitive,
            auto_correct: self.auto_correct,
        }
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        doc_type: DocType,

        #[serde(default)]
        smart_spacing: bool,

        #[serde(default)]
        case_sensitive: bool,

        #[serde(default)]
        auto_correct: bool,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        checks: Vec<CheckKind>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                doc_type,
                smart_spacing,
                case_sensitive,
                auto_correct,
                checks,
            } => Self {
                doc_type,
                smart_spacing,
                case_sensitive,
                auto_correct,
                checks,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            doc_type: config.doc_type,
            smart_spacing: config.smart_spacing,
            case_sensitive: config.case_sensitive,
            auto_correct: config.auto_correct,
            checks: config.checks,
        }
    }
}
