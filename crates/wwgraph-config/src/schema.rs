//! Typed credential structures

use crate::loader::ConfigError;
use serde::Deserialize;

/// Contents of the secrets file. Platform tables are optional; a platform
/// is only validated when its posting flag is actually enabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    pub twitter: Option<TwitterCredentials>,
    pub mastodon: Option<MastodonCredentials>,
}

/// OAuth 1.0a user-context credentials for the Twitter API
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Access credentials for a Mastodon instance
#[derive(Debug, Clone, Deserialize)]
pub struct MastodonCredentials {
    /// Instance base URL, e.g. "https://mastodon.tds.xyz"
    pub api_base_url: String,
    pub access_token: String,
}

fn require_field(value: &str, table: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: format!("{table}.{field}"),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

impl TwitterCredentials {
    /// Check that every field required for signing is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_field(&self.consumer_key, "twitter", "consumer_key")?;
        require_field(&self.consumer_secret, "twitter", "consumer_secret")?;
        require_field(&self.access_token, "twitter", "access_token")?;
        require_field(&self.access_token_secret, "twitter", "access_token_secret")?;
        Ok(())
    }
}

impl MastodonCredentials {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_field(&self.api_base_url, "mastodon", "api_base_url")?;
        require_field(&self.access_token, "mastodon", "access_token")?;
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidField {
                field: "mastodon.api_base_url".to_string(),
                reason: "must be an http(s) URL".to_string(),
            });
        }
        Ok(())
    }
}

impl Secrets {
    /// Return validated Twitter credentials, or a descriptive error when the
    /// `[twitter]` table is missing or incomplete.
    pub fn twitter(&self) -> Result<&TwitterCredentials, ConfigError> {
        let creds = self
            .twitter
            .as_ref()
            .ok_or_else(|| ConfigError::MissingTable("twitter".to_string()))?;
        creds.validate()?;
        Ok(creds)
    }

    /// Return validated Mastodon credentials, or a descriptive error when the
    /// `[mastodon]` table is missing or incomplete.
    pub fn mastodon(&self) -> Result<&MastodonCredentials, ConfigError> {
        let creds = self
            .mastodon
            .as_ref()
            .ok_or_else(|| ConfigError::MissingTable("mastodon".to_string()))?;
        creds.validate()?;
        Ok(creds)
    }
}
