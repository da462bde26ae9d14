//! # Configuration
//!
//! Optional YAML file read by the CLI. Every key may be omitted:
//!
//! ```yaml
//! separator: " "          # between semitone values, default "·"
//! rules: my-rules.yaml    # rule table replacing the built-in one
//! color: false            # colored trace output, default true
//! ```
//!
//! A relative `rules` path is resolved against the config file's directory.
//! Command-line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use aura_core::{ChordEngine, RuleTable};
use serde::Deserialize;
use tracing::debug;

use crate::error::AuraError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub separator: Option<String>,
    pub rules: Option<PathBuf>,
    pub color: Option<bool>,
}

impl Config {
    pub fn from_yaml(source: &str) -> Result<Self, AuraError> {
        if source.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Read a config file, resolving `rules` next to it.
    pub fn load(path: &Path) -> Result<Self, AuraError> {
        let source = read_file(path)?;
        let mut config = Config::from_yaml(&source)?;
        if let (Some(rules), Some(dir)) = (&config.rules, path.parent()) {
            if rules.is_relative() {
                config.rules = Some(dir.join(rules));
            }
        }
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Layer command-line overrides on top of the file's values.
    pub fn merge(
        mut self,
        separator: Option<String>,
        rules: Option<PathBuf>,
        no_color: bool,
    ) -> Self {
        if separator.is_some() {
            self.separator = separator;
        }
        if rules.is_some() {
            self.rules = rules;
        }
        if no_color {
            self.color = Some(false);
        }
        self
    }

    pub fn color(&self) -> bool {
        self.color.unwrap_or(true)
    }

    /// The configured rule table, or the built-in one.
    pub fn rule_table(&self) -> Result<RuleTable, AuraError> {
        match &self.rules {
            Some(path) => Ok(RuleTable::from_yaml(&read_file(path)?)?),
            None => Ok(RuleTable::standard()),
        }
    }

    pub fn engine(&self) -> Result<ChordEngine, AuraError> {
        let engine = ChordEngine::new(self.rule_table()?);
        Ok(match &self.separator {
            Some(separator) => engine.with_separator(separator.clone()),
            None => engine,
        })
    }
}

fn read_file(path: &Path) -> Result<String, AuraError> {
    fs::read_to_string(path).map_err(|source| AuraError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.color());
    }

    #[test]
    fn test_parse_config() {
        let config = Config::from_yaml("separator: \" \"\ncolor: false\n").unwrap();
        assert_eq!(config.separator.as_deref(), Some(" "));
        assert!(!config.color());
        assert_eq!(config.rules, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            Config::from_yaml("colour: true"),
            Err(AuraError::Config(_))
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_yaml("separator: \",\"\n")
            .unwrap()
            .merge(Some("-".to_string()), None, true);
        assert_eq!(config.separator.as_deref(), Some("-"));
        assert_eq!(config.color, Some(false));
    }

    #[test]
    fn test_engine_uses_separator() {
        let config = Config {
            separator: Some(" ".to_string()),
            ..Config::default()
        };
        let chord = config.engine().unwrap().parse("Cm7").unwrap();
        assert_eq!(chord.formatted.display, "0 3 7 10");
    }

    #[test]
    fn test_missing_rules_file() {
        let config = Config {
            rules: Some(PathBuf::from("/nonexistent/rules.yaml")),
            ..Config::default()
        };
        assert!(matches!(config.engine(), Err(AuraError::Io { .. })));
    }
}
