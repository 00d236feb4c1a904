//! Process configuration, read once at startup.

use std::fmt;

use fundamentals_core::{
    DEFAULT_PERIOD_WINDOW, FundamentalsError, PeriodType, Result, TargetMarket,
};

/// Environment variable holding the language-model API key.
pub const LLM_API_KEY_VAR: &str = "OPENAI_KEY";
/// Environment variable overriding the language-model API root.
pub const LLM_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable holding the fundamentals API key.
pub const FUNDAMENTALS_API_KEY_VAR: &str = "ALPHAVANTAGE_KEY";
/// Older spelling of [`FUNDAMENTALS_API_KEY_VAR`], still accepted.
pub const LEGACY_FUNDAMENTALS_API_KEY_VAR: &str = "Alphavantage_key";
/// Environment variable holding the target market region.
pub const TARGET_MARKET_VAR: &str = "TARGET_MARKET";
/// Environment variable holding the number of periods to keep.
pub const PERIOD_WINDOW_VAR: &str = "PERIOD_WINDOW";
/// Environment variable selecting annual or quarterly statements.
pub const PERIOD_TYPE_VAR: &str = "PERIOD_TYPE";

/// Credentials and lookup settings shared by every component.
#[derive(Clone)]
pub struct AppConfig {
    /// Language-model API key.
    pub llm_api_key: String,
    /// Language-model API root, when not the provider default.
    pub llm_base_url: Option<String>,
    /// Fundamentals provider API key.
    pub fundamentals_api_key: String,
    /// Region a listing must be in to be picked.
    pub target_market: TargetMarket,
    /// Most recent periods kept per statement.
    pub period_window: usize,
    /// Annual or quarterly statements.
    pub period_type: PeriodType,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("llm_api_key", &"[REDACTED]")
            .field("llm_base_url", &self.llm_base_url)
            .field("fundamentals_api_key", &"[REDACTED]")
            .field("target_market", &self.target_market)
            .field("period_window", &self.period_window)
            .field("period_type", &self.period_type)
            .finish()
    }
}

impl AppConfig {
    /// Creates a configuration with default lookup settings.
    #[must_use]
    pub fn new(llm_api_key: impl Into<String>, fundamentals_api_key: impl Into<String>) -> Self {
        Self {
            llm_api_key: llm_api_key.into(),
            llm_base_url: None,
            fundamentals_api_key: fundamentals_api_key.into(),
            target_market: TargetMarket::default(),
            period_window: DEFAULT_PERIOD_WINDOW,
            period_type: PeriodType::default(),
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Fails on a missing or blank credential, an empty target market, a
    /// window below 1 or an unknown period type.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm_api_key = value(LLM_API_KEY_VAR).ok_or_else(|| missing(LLM_API_KEY_VAR))?;
        let fundamentals_api_key = value(FUNDAMENTALS_API_KEY_VAR)
            .or_else(|| value(LEGACY_FUNDAMENTALS_API_KEY_VAR))
            .ok_or_else(|| missing(FUNDAMENTALS_API_KEY_VAR))?;

        let mut config = Self::new(llm_api_key.trim(), fundamentals_api_key.trim());
        config.llm_base_url = value(LLM_BASE_URL_VAR);

        if let Some(market) = lookup(TARGET_MARKET_VAR) {
            config.target_market = TargetMarket::new(market)?;
        }

        if let Some(window) = value(PERIOD_WINDOW_VAR) {
            config.period_window = match window.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(FundamentalsError::Configuration(format!(
                        "{PERIOD_WINDOW_VAR} must be a positive integer, got {window:?}"
                    )));
                }
            };
        }

        if let Some(period) = value(PERIOD_TYPE_VAR) {
            config.period_type = period.parse()?;
        }

        Ok(config)
    }
}

fn missing(key: &str) -> FundamentalsError {
    FundamentalsError::Configuration(format!("{key} is not set"))
}
