//! Credential configuration for the wwgraph wastewater bot
//!
//! Credentials live in a TOML file (`secrets.toml` by default) with one
//! table per platform. Each table is an explicit struct with named fields,
//! validated before any network call is attempted.

pub mod loader;
pub mod schema;

pub use loader::{ConfigError, SecretsLoader};
pub use schema::{MastodonCredentials, Secrets, TwitterCredentials};
