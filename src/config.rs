//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present, so
//! local setups can keep credentials out of the shell profile.

use std::path::PathBuf;
use std::time::Duration;

/// Default model for onboarding completions.
pub const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-20250514";

/// Default client-side onboarding timeout.
pub const DEFAULT_ONBOARDING_TIMEOUT_SECS: u64 = 35;

/// Settings shared by adapters and dashboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the dashboard REST API, e.g. `https://app.example.com`.
    pub api_base_url: Option<String>,
    /// Bearer token sent to the REST API.
    pub api_token: Option<String>,
    /// Identity of the signed-in caller.
    pub user_id: Option<String>,
    /// API key for the completion provider.
    pub anthropic_api_key: Option<String>,
    /// Model used for onboarding completions.
    pub llm_model: String,
    /// How long the onboarding flow waits for a completion.
    pub onboarding_timeout: Duration,
    /// OAuth client id for calendar access.
    pub google_client_id: Option<String>,
    /// OAuth client secret for calendar access.
    pub google_client_secret: Option<String>,
    /// OAuth redirect URI for calendar access.
    pub google_redirect_uri: Option<String>,
    /// When set, every port interaction is recorded to cassettes under this directory.
    pub record_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            api_token: None,
            user_id: None,
            anthropic_api_key: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            onboarding_timeout: Duration::from_secs(DEFAULT_ONBOARDING_TIMEOUT_SECS),
            google_client_id: None,
            google_client_secret: None,
            google_redirect_uri: None,
            record_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error string when a numeric setting cannot be parsed.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error string when a numeric setting cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let onboarding_timeout = match get("OPSBOARD_ONBOARDING_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                format!("OPSBOARD_ONBOARDING_TIMEOUT_SECS must be a whole number of seconds: {e}")
            })?),
            None => Duration::from_secs(DEFAULT_ONBOARDING_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url: get("OPSBOARD_API_URL").map(|u| u.trim_end_matches('/').to_string()),
            api_token: get("OPSBOARD_API_TOKEN"),
            user_id: get("OPSBOARD_USER_ID"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            llm_model: get("OPSBOARD_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            onboarding_timeout,
            google_client_id: get("GOOGLE_CLIENT_ID"),
            google_client_secret: get("GOOGLE_CLIENT_SECRET"),
            google_redirect_uri: get("GOOGLE_CLIENT_URI"),
            record_dir: get("OPSBOARD_RECORD").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_and_normalises_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPSBOARD_API_URL", "https://dash.example.com/"),
            ("OPSBOARD_USER_ID", "user_1"),
            ("OPSBOARD_ONBOARDING_TIMEOUT_SECS", "5"),
            ("GOOGLE_CLIENT_ID", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("https://dash.example.com"));
        assert_eq!(config.user_id.as_deref(), Some("user_1"));
        assert_eq!(config.onboarding_timeout, Duration::from_secs(5));
        assert!(config.google_client_id.is_none());
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err =
            AppConfig::from_lookup(lookup(&[("OPSBOARD_ONBOARDING_TIMEOUT_SECS", "soon")]))
                .unwrap_err();
        assert!(err.contains("OPSBOARD_ONBOARDING_TIMEOUT_SECS"));
    }
}
