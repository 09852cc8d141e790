//! Parser configuration
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! max_depth = 32
//! duplicate_keys = "reject"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on template nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// What the reference builder does when a keyword appears more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeys {
    /// Later entries overwrite earlier ones
    #[default]
    LastWins,
    /// The first entry is kept, later ones are ignored
    FirstWins,
    /// A repeated key is a `DuplicateKey` error
    Reject,
}

impl fmt::Display for DuplicateKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateKeys::LastWins => write!(f, "last-wins"),
            DuplicateKeys::FirstWins => write!(f, "first-wins"),
            DuplicateKeys::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for DuplicateKeys {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-wins" | "last" => Ok(DuplicateKeys::LastWins),
            "first-wins" | "first" => Ok(DuplicateKeys::FirstWins),
            "reject" | "error" => Ok(DuplicateKeys::Reject),
            other => Err(format!("unknown duplicate key policy '{}'", other)),
        }
    }
}

/// Configuration options for parsing and reference building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Deepest template nesting accepted; the top-level template is depth 1
    pub max_depth: usize,

    /// Policy for repeated keyword arguments
    pub duplicate_keys: DuplicateKeys,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicate_keys: DuplicateKeys::default(),
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the duplicate keyword policy
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.duplicate_keys, DuplicateKeys::LastWins);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::new()
            .with_max_depth(3)
            .with_duplicate_keys(DuplicateKeys::Reject);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.duplicate_keys, DuplicateKeys::Reject);
    }

    #[test]
    fn test_from_toml() {
        let config = ParserConfig::from_str(
            r#"
            max_depth = 8
            duplicate_keys = "first-wins"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.duplicate_keys, DuplicateKeys::FirstWins);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ParserConfig::from_str("max_depth = 2").unwrap();
        assert_eq!(config.duplicate_keys, DuplicateKeys::LastWins);
        assert_eq!(ParserConfig::from_str("").unwrap(), ParserConfig::default());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = ParserConfig::from_str("depth = 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reject".parse::<DuplicateKeys>(), Ok(DuplicateKeys::Reject));
        assert_eq!("Last-Wins".parse::<DuplicateKeys>(), Ok(DuplicateKeys::LastWins));
        assert!("sometimes".parse::<DuplicateKeys>().is_err());
        assert_eq!(DuplicateKeys::FirstWins.to_string(), "first-wins");
    }
}
