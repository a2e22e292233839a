//! Secrets file loading

use crate::Secrets;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading the secrets file
    #[error("Failed to read secrets file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse secrets file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A platform was enabled but its credential table is missing
    #[error("Missing [{0}] table in secrets file")]
    MissingTable(String),

    /// A credential field failed validation
    #[error("Invalid credential field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl From<ConfigError> for wwgraph_common::WwgraphError {
    fn from(err: ConfigError) -> Self {
        wwgraph_common::WwgraphError::config(err.to_string())
    }
}

/// Loader for the secrets file
pub struct SecretsLoader;

impl SecretsLoader {
    /// Read and parse the secrets file. Per-platform validation happens
    /// later, once the run's flags say which platforms are in play.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Secrets, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let secrets: Secrets = toml::from_str(&content)?;
        debug!(
            path = %path.as_ref().display(),
            has_twitter = secrets.twitter.is_some(),
            has_mastodon = secrets.mastodon.is_some(),
            "loaded secrets file"
        );
        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[twitter]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "at"
access_token_secret = "ats"

[mastodon]
api_base_url = "https://mastodon.tds.xyz"
access_token = "token"
"#;

    #[test]
    fn test_load_full_secrets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let secrets = SecretsLoader::load_from_file(file.path()).unwrap();
        assert_eq!(secrets.twitter().unwrap().consumer_key, "ck");
        assert_eq!(
            secrets.mastodon().unwrap().api_base_url,
            "https://mastodon.tds.xyz"
        );
    }

    #[test]
    fn test_load_partial_secrets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[mastodon]\napi_base_url = \"https://m.example\"\naccess_token = \"t\"\n")
            .unwrap();

        let secrets = SecretsLoader::load_from_file(file.path()).unwrap();
        assert!(secrets.twitter.is_none());
        assert!(secrets.mastodon().is_ok());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = SecretsLoader::load_from_file("/nonexistent/secrets.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[twitter\nconsumer_key=").unwrap();

        let err = SecretsLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
