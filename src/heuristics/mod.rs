pub mod family_name;
pub mod roles;
pub mod text;
pub mod truncate;

pub use family_name::*;
pub use roles::*;
pub use text::*;
pub use truncate::*;

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::io::InputError;

/// Jurisdiction-specific tables used by the parsers
///
/// The defaults are calibrated on one city's rosters; other assemblies will
/// usually need their own role titles and one-character surnames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Role titles in priority order (specific titles before generic ones)
    pub role_titles: Vec<String>,
    /// Surnames written with a single character
    pub one_char_family_names: Vec<String>,
    /// Maximum name length in a speaker label, in characters
    pub max_speaker_name_chars: usize,
    /// Minimum length of an accepted attendee name, in characters
    pub min_name_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            role_titles: DEFAULT_ROLE_TITLES.iter().map(|s| s.to_string()).collect(),
            one_char_family_names: DEFAULT_ONE_CHAR_FAMILY_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_speaker_name_chars: 8,
            min_name_chars: 2,
        }
    }
}

impl ParserConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| InputError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A [`ParserConfig`] compiled into lookup structures
#[derive(Debug, Clone)]
pub struct Lexicon {
    roles: RoleTable,
    one_char_family_names: HashSet<char>,
    max_speaker_name_chars: usize,
    min_name_chars: usize,
}

impl Lexicon {
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut one_char_family_names = HashSet::new();
        for name in &config.one_char_family_names {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    one_char_family_names.insert(c);
                }
                _ => warn!("Ignoring one-char family name {:?}", name),
            }
        }

        Self {
            roles: RoleTable::new(config.role_titles.iter().cloned()),
            one_char_family_names,
            max_speaker_name_chars: config.max_speaker_name_chars,
            min_name_chars: config.min_name_chars,
        }
    }

    /// Process-wide lexicon built from the default config
    pub fn shared() -> &'static Lexicon {
        static SHARED: OnceLock<Lexicon> = OnceLock::new();
        SHARED.get_or_init(Lexicon::default)
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn max_speaker_name_chars(&self) -> usize {
        self.max_speaker_name_chars
    }

    pub fn min_name_chars(&self) -> usize {
        self.min_name_chars
    }

    pub fn guess_family_name(&self, name: &str) -> String {
        guess_family_name_from_normalized(name, &self.one_char_family_names)
    }

    pub fn truncate_to_name(&self, candidate: &str) -> String {
        truncate_to_name(candidate, &self.roles, self.min_name_chars)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: ParserConfig = serde_json::from_str(r#"{"max_speaker_name_chars": 6}"#).unwrap();
        assert_eq!(config.max_speaker_name_chars, 6);
        assert_eq!(config.min_name_chars, 2);
        assert_eq!(config.role_titles.len(), DEFAULT_ROLE_TITLES.len());
    }

    #[test]
    fn test_lexicon_uses_custom_surnames() {
        let config = ParserConfig {
            one_char_family_names: vec!["南".to_string(), "長い".to_string()],
            ..Default::default()
        };
        let lexicon = Lexicon::from_config(&config);
        assert_eq!(lexicon.guess_family_name("南克彦"), "南");
        assert_eq!(lexicon.guess_family_name("林太郎"), "林太");
    }

    #[test]
    fn test_lexicon_truncates_with_configured_minimum() {
        let config = ParserConfig {
            min_name_chars: 4,
            ..Default::default()
        };
        assert_eq!(Lexicon::from_config(&config).truncate_to_name("高藤誠事務局"), "高藤誠事務");
        assert_eq!(Lexicon::default().truncate_to_name("高藤誠事務局"), "高藤誠");
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"role_titles": ["町長", "副町長"]}"#).unwrap();

        let config = ParserConfig::from_file(&path).unwrap();
        let lexicon = Lexicon::from_config(&config);
        assert_eq!(lexicon.roles().len(), 2);
        assert_eq!(lexicon.roles().suffix_of("山田副町長").unwrap().title, "副町長");
    }

    #[test]
    fn test_config_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ParserConfig::from_file(&path),
            Err(InputError::Config { .. })
        ));
    }
}
