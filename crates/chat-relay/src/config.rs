//! Immutable relay configuration.
//!
//! Required settings stay `Option`s and are checked per request: the server
//! may boot half-configured (matching the deployment it replaces) and every
//! chat request then fails fast with a message naming the missing setting,
//! before any provider is contacted.

use std::time::Duration;

use crate::error::RelayError;

/// Setting names used in `Missing ...` error messages; these match the
/// environment variables the server loads them from.
pub const SETTING_STATIC_USER_ID: &str = "STATIC_USER_ID";
pub const SETTING_MODEL: &str = "OPENAI_MODEL";
pub const SETTING_API_KEY: &str = "OPENAI_API_KEY";

/// Default token budget for the memory context blob.
pub const DEFAULT_CONTEXT_MAX_TOKENS: usize = 750;

/// Default bound on one whole relay call (context resolution + streaming).
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(30);

/// Read-only configuration handed to [`ChatRelay`](crate::ChatRelay) at
/// construction. The credential is held only for presence checking and is
/// never logged by this crate.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub static_user_id: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub context_max_tokens: usize,
    pub max_duration: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            static_user_id: None,
            model: None,
            api_key: None,
            context_max_tokens: DEFAULT_CONTEXT_MAX_TOKENS,
            max_duration: DEFAULT_MAX_DURATION,
        }
    }
}

/// Borrowed view of the settings once validation has passed.
#[derive(Debug)]
pub(crate) struct ValidSettings<'a> {
    pub user_id: &'a str,
    pub model: &'a str,
}

impl RelayConfig {
    /// Checks that every required setting is present and non-empty.
    /// The first missing one is reported; no partial work is attempted.
    pub(crate) fn validated(&self) -> Result<ValidSettings<'_>, RelayError> {
        let user_id = require(&self.static_user_id, SETTING_STATIC_USER_ID)?;
        let model = require(&self.model, SETTING_MODEL)?;
        require(&self.api_key, SETTING_API_KEY)?;
        Ok(ValidSettings { user_id, model })
    }
}

fn require<'a>(
    value: &'a Option<String>,
    setting: &'static str,
) -> Result<&'a str, RelayError> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(RelayError::Config { setting })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> RelayConfig {
        RelayConfig {
            static_user_id: Some("U".to_string()),
            model: Some("gpt-4o".to_string()),
            api_key: Some("sk-test".to_string()),
            ..RelayConfig::default()
        }
    }

    #[test]
    fn complete_config_validates() {
        let config = full_config();
        let settings = config.validated().unwrap();
        assert_eq!(settings.user_id, "U");
        assert_eq!(settings.model, "gpt-4o");
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let config = RelayConfig {
            api_key: Some(String::new()),
            ..full_config()
        };
        let err = config.validated().unwrap_err();
        assert_eq!(err.to_string(), "Missing OPENAI_API_KEY");
    }

    #[test]
    fn first_missing_setting_wins() {
        let config = RelayConfig::default();
        let err = config.validated().unwrap_err();
        assert_eq!(err.to_string(), "Missing STATIC_USER_ID");
    }
}
