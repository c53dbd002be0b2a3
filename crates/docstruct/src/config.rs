use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ConfigError;
use crate::project::NamespaceFilter;

/// Which classes of a project are resolved and how descriptors are shared.
///
/// ```toml
/// include_prefixes = ["App\\"]
/// exclude_prefixes = "App\\Legacy\\"
/// share_descriptors = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// A class is in scope only if its name starts with one of these
    #[serde(default, deserialize_with = "one_or_many")]
    pub include_prefixes: Vec<String>,
    /// Names starting with one of these are rejected before includes are checked
    #[serde(default, deserialize_with = "one_or_many")]
    pub exclude_prefixes: Vec<String>,
    /// Reuse one descriptor per class name across the whole run. When false,
    /// every parent/interface reference gets a fresh descriptor.
    #[serde(default = "default_share_descriptors")]
    pub share_descriptors: bool,
}

fn default_share_descriptors() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(prefix) => vec![prefix],
        OneOrMany::Many(prefixes) => prefixes,
    })
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            include_prefixes: Vec::new(),
            exclude_prefixes: Vec::new(),
            share_descriptors: default_share_descriptors(),
        }
    }
}

impl ResolutionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn filter(&self) -> NamespaceFilter {
        NamespaceFilter::new(self.include_prefixes.clone(), self.exclude_prefixes.clone())
    }
}

#[derive(Debug, Default)]
pub struct ResolutionConfigBuilder {
    config: ResolutionConfig,
}

impl ResolutionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, prefix: impl Into<String>) -> Self {
        self.config.include_prefixes.push(prefix.into());
        self
    }

    pub fn exclude(mut self, prefix: impl Into<String>) -> Self {
        self.config.exclude_prefixes.push(prefix.into());
        self
    }

    pub fn share_descriptors(mut self, share: bool) -> Self {
        self.config.share_descriptors = share;
        self
    }

    pub fn build(self) -> ResolutionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ResolutionConfig::from_toml_str("").unwrap();

        assert!(config.include_prefixes.is_empty());
        assert!(config.exclude_prefixes.is_empty());
        assert!(config.share_descriptors);
        assert_eq!(config, ResolutionConfig::default());
    }

    #[test]
    fn test_single_prefix_is_accepted_as_list() {
        let config = ResolutionConfig::from_toml_str(
            r#"
            include_prefixes = 'App\'
            exclude_prefixes = ['App\Legacy\', 'App\Tests\']
            share_descriptors = false
            "#,
        )
        .unwrap();

        assert_eq!(config.include_prefixes, vec!["App\\".to_string()]);
        assert_eq!(config.exclude_prefixes.len(), 2);
        assert!(!config.share_descriptors);
    }

    #[test]
    fn test_builder_matches_toml() {
        let built = ResolutionConfigBuilder::new()
            .include("App\\")
            .exclude("App\\Legacy\\")
            .build();
        let parsed = ResolutionConfig::from_toml_str(
            r#"
            include_prefixes = ['App\']
            exclude_prefixes = ['App\Legacy\']
            "#,
        )
        .unwrap();

        assert_eq!(built, parsed);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "include_prefixes = ['Vendor\\']").unwrap();

        let config = ResolutionConfig::from_file(file.path()).unwrap();

        assert_eq!(config.include_prefixes, vec!["Vendor\\".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = ResolutionConfig::from_toml_str("include_prefixes = 3").unwrap_err();

        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
