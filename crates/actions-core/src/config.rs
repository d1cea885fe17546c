use crate::error::Result;
use crate::locale::LocaleChain;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB: &str = "actions/MacOS-15.4/raw.sqlite";
pub const DEFAULT_OUTPUT: &str = "compiled.json";
pub const DEFAULT_LOCALE: &str = "en";

// ---------------------------------------------------------------------------
// CompileConfig
// ---------------------------------------------------------------------------

/// Settings for one compilation run. Every field has a usable default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileConfig {
    #[serde(default = "default_db")]
    pub db: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: Option<String>,
}

fn default_db() -> PathBuf {
    PathBuf::from(DEFAULT_DB)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_fallback_locale() -> Option<String> {
    Some(DEFAULT_LOCALE.to_string())
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            db: default_db(),
            output: default_output(),
            locale: default_locale(),
            fallback_locale: default_fallback_locale(),
        }
    }
}

impl CompileConfig {
    /// Load settings from a YAML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: CompileConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// The fallback locale, with an empty string treated as absent.
    pub fn fallback(&self) -> Option<&str> {
        self.fallback_locale.as_deref().filter(|f| !f.is_empty())
    }

    pub fn locale_chain(&self) -> LocaleChain {
        LocaleChain::new(self.locale.clone(), self.fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = CompileConfig::default();
        assert_eq!(cfg.db, PathBuf::from("actions/MacOS-15.4/raw.sqlite"));
        assert_eq!(cfg.output, PathBuf::from("compiled.json"));
        assert_eq!(cfg.locale, "en");
        assert_eq!(cfg.fallback(), Some("en"));
        assert_eq!(cfg.locale_chain().tiers(), ["en"]);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compile.yaml");
        std::fs::write(&path, "locale: fr\ndb: data/raw.sqlite\n").unwrap();

        let cfg = CompileConfig::load(&path).unwrap();
        assert_eq!(cfg.locale, "fr");
        assert_eq!(cfg.db, PathBuf::from("data/raw.sqlite"));
        assert_eq!(cfg.output, PathBuf::from("compiled.json"));
        assert_eq!(cfg.locale_chain().tiers(), ["fr", "en"]);
    }

    #[test]
    fn null_or_empty_fallback_disables_second_tier() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compile.yaml");
        std::fs::write(&path, "locale: de\nfallback_locale: null\n").unwrap();
        let cfg = CompileConfig::load(&path).unwrap();
        assert_eq!(cfg.fallback(), None);
        assert_eq!(cfg.locale_chain().tiers(), ["de"]);

        let cfg = CompileConfig {
            fallback_locale: Some(String::new()),
            ..CompileConfig::default()
        };
        assert_eq!(cfg.fallback(), None);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compile.yaml");
        std::fs::write(&path, "locale: [unterminated\n").unwrap();
        assert!(CompileConfig::load(&path).is_err());
    }
}
