//! Proxy configuration
//!
//! ```toml
//! [proxy]
//! cache = true                  # per-proxy value cache
//! multi_value_policy = "reject" # or "first"
//! deny = ["Auditable"]          # declaring interfaces always denied
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::Deserialize;

use crate::coerce::MultiValuePolicy;
use crate::deny::DenyList;
use crate::error::ConfigError;

/// Options applied to every proxy a factory creates
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Cache resolved values per proxy
    pub cache: bool,

    /// Multi-valued property through a scalar getter
    pub multi_value_policy: MultiValuePolicy,

    /// Deny patterns merged into every proxy's deny list
    pub deny: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            cache: true,
            multi_value_policy: MultiValuePolicy::Reject,
            deny: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    proxy: ProxyConfig,
}

impl ProxyConfig {
    /// Load from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.proxy.validate()?;
        Ok(file.proxy)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.deny {
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Invalid(
                    "Deny pattern cannot be empty".to_string(),
                ));
            }
            if trimmed.trim_end_matches('*').contains('*') {
                return Err(ConfigError::Invalid(format!(
                    "Invalid deny pattern: {}. '*' is only allowed at the end",
                    pattern
                )));
            }
        }
        Ok(())
    }

    /// Configured deny patterns as a [`DenyList`]
    pub fn deny_list(&self) -> DenyList {
        DenyList::from_patterns(self.deny.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProxyConfig::default());
        assert!(config.cache);
        assert_eq!(config.multi_value_policy, MultiValuePolicy::Reject);
        assert!(config.deny_list().is_empty());
    }

    #[test]
    fn test_full_section() {
        let config = ProxyConfig::from_toml_str(
            r#"
            [proxy]
            cache = false
            multi_value_policy = "first"
            deny = ["Auditable", "com.acme.*"]
            "#,
        )
        .unwrap();
        assert!(!config.cache);
        assert_eq!(config.multi_value_policy, MultiValuePolicy::First);
        assert!(config.deny_list().denies("com.acme.Secret"));
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert!(matches!(
            ProxyConfig::from_toml_str("[proxy]\ncaching = true"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ProxyConfig::from_toml_str("[proxy]\nmulti_value_policy = \"last\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_deny_patterns() {
        assert!(matches!(
            ProxyConfig::from_toml_str("[proxy]\ndeny = [\"\"]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ProxyConfig::from_toml_str("[proxy]\ndeny = [\"a*b\"]"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ProxyConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
