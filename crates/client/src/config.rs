//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPSYNC_API_ENDPOINT` - GraphQL endpoint URL of the remote source
//!
//! ## Optional
//! - `SHOPSYNC_API_TIMEOUT_SECS` - Remote request timeout (default: 10)
//! - `SHOPSYNC_DATA_DIR` - Directory for the persisted local store
//!   (default: `.shopsync`)
//! - `SHOPSYNC_DEFAULT_AVATAR` - Avatar URL attached to registrations that
//!   supply none
//! - `SHOPSYNC_CATEGORY_POLICY` - Which remote categories are merged into
//!   the category listing: `ledger` (none; user-created only) or
//!   `keyword[:<needle>]` (remote names containing `<needle>`,
//!   default needle: `electronics`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use shopsync_core::DEFAULT_CATEGORY_NAME;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DATA_DIR: &str = ".shopsync";
const DEFAULT_AVATAR_URL: &str = "https://api.lorem.space/image/face?w=150&h=150";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Policy for merging remote categories into the category listing.
///
/// The pinned default category is always present and first regardless of
/// policy; user-created categories (tracked in the ledger) always survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMergePolicy {
    /// No remote category query; the listing is pinned + user-created only.
    LedgerOnly,
    /// Query remote categories and keep those whose name case-insensitively
    /// contains the needle.
    Keyword(String),
}

impl Default for CategoryMergePolicy {
    fn default() -> Self {
        Self::Keyword(DEFAULT_CATEGORY_NAME.to_string())
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint of the remote source.
    pub api_endpoint: Url,
    /// Timeout applied to every remote call; a hung remote call fails
    /// instead of suspending the caller indefinitely.
    pub api_timeout: Duration,
    /// Directory holding the persisted local entries.
    pub data_dir: PathBuf,
    /// Avatar URL synthesized for registrations without one.
    pub default_avatar: String,
    /// Remote category merge policy.
    pub category_policy: CategoryMergePolicy,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_endpoint = get_required_env("SHOPSYNC_API_ENDPOINT")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPSYNC_API_ENDPOINT".to_string(), e.to_string())
            })?;
        let api_timeout = get_env_or_default(
            "SHOPSYNC_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPSYNC_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let data_dir = PathBuf::from(get_env_or_default("SHOPSYNC_DATA_DIR", DEFAULT_DATA_DIR));
        let default_avatar = get_env_or_default("SHOPSYNC_DEFAULT_AVATAR", DEFAULT_AVATAR_URL);
        let category_policy = parse_category_policy(&get_env_or_default(
            "SHOPSYNC_CATEGORY_POLICY",
            "keyword",
        ))?;

        Ok(Self {
            api_endpoint,
            api_timeout,
            data_dir,
            default_avatar,
            category_policy,
        })
    }
}

fn parse_category_policy(raw: &str) -> Result<CategoryMergePolicy, ConfigError> {
    match raw {
        "ledger" => Ok(CategoryMergePolicy::LedgerOnly),
        "keyword" => Ok(CategoryMergePolicy::default()),
        other => match other.strip_prefix("keyword:") {
            Some(needle) if !needle.is_empty() => {
                Ok(CategoryMergePolicy::Keyword(needle.to_string()))
            }
            _ => Err(ConfigError::InvalidEnvVar(
                "SHOPSYNC_CATEGORY_POLICY".to_string(),
                format!("expected 'ledger' or 'keyword[:<needle>]', got '{other}'"),
            )),
        },
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
