use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::seed::DEFAULT_FINANCIAL_GOALS;

/// Provider key for the Alpha Vantage stock quote API.
pub const ALPHA_VANTAGE_KEY: &str = "alphavantage";

/// Provider key for the OpenAI chat-completions API (generative insights).
pub const OPENAI_KEY: &str = "openai";

/// Default freshness window for cached quotes, in seconds.
pub const DEFAULT_QUOTE_CACHE_TTL_SECS: u64 = 60;

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API keys for providers that require them.
    /// Keys: provider name ("alphavantage", "openai"). Values: the API key string.
    pub api_keys: HashMap<String, String>,

    /// How long a fetched quote counts as fresh
    pub quote_cache_ttl_secs: u64,

    /// Identifier passed along with spending-summary requests
    pub user_id: String,

    /// Free-text goals fed into the investment-tips request
    pub financial_goals: String,

    /// Model name used by the insight provider
    pub insight_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
            quote_cache_ttl_secs: DEFAULT_QUOTE_CACHE_TTL_SECS,
            user_id: "demo-user".to_string(),
            financial_goals: DEFAULT_FINANCIAL_GOALS.to_string(),
            insight_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Settings {
    /// Build settings from process environment variables, falling back to defaults.
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY`, `OPENAI_API_KEY`, `QUOTE_CACHE_TTL_SECS`,
    /// `DASHBOARD_USER_ID`, `FINANCIAL_GOALS` and `INSIGHT_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, with a custom variable lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank("ALPHA_VANTAGE_API_KEY") {
            settings.api_keys.insert(ALPHA_VANTAGE_KEY.to_string(), key);
        }
        if let Some(key) = non_blank("OPENAI_API_KEY") {
            settings.api_keys.insert(OPENAI_KEY.to_string(), key);
        }
        if let Some(ttl) = non_blank("QUOTE_CACHE_TTL_SECS") {
            match ttl.trim().parse() {
                Ok(secs) => settings.quote_cache_ttl_secs = secs,
                Err(_) => tracing::warn!(
                    value = %ttl,
                    "ignoring invalid QUOTE_CACHE_TTL_SECS, using {DEFAULT_QUOTE_CACHE_TTL_SECS}s"
                ),
            }
        }
        if let Some(user) = non_blank("DASHBOARD_USER_ID") {
            settings.user_id = user;
        }
        if let Some(goals) = non_blank("FINANCIAL_GOALS") {
            settings.financial_goals = goals;
        }
        if let Some(model) = non_blank("INSIGHT_MODEL") {
            settings.insight_model = model;
        }
        settings
    }

    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys
            .get(provider)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }
}
