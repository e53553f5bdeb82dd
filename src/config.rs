// src/config.rs
use crate::utils::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

pub const USER_AGENT_ENV: &str = "SEC_EDGAR_USER_AGENT";
pub const RATE_LIMIT_ENV: &str = "SEC_EDGAR_RATE_LIMIT_MS";

pub const DEFAULT_DATA_BASE_URL: &str = "https://data.sec.gov";
pub const DEFAULT_WWW_BASE_URL: &str = "https://www.sec.gov";

// SEC asks for 10 requests/second max, so no delay below 100ms.
pub const MIN_RATE_LIMIT_DELAY_MS: u64 = 100;
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// "<application>/<version> (<contact email>)"
static USER_AGENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^/\s][^/]*/\S+\s+\(\s*[^()\s@]+@[^()\s@]+\.[^()\s@]+\s*\)$")
        .expect("Failed to compile USER_AGENT_RE")
});

/// Settings for talking to EDGAR.
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// Sent on every request; SEC rejects anonymous clients.
    pub user_agent: String,
    /// Sleep before each request.
    pub rate_limit_delay: Duration,
    pub timeout: Duration,
    /// Host for submissions and XBRL endpoints.
    pub data_base_url: String,
    /// Host for company_tickers.json and filing archives.
    pub www_base_url: String,
}

impl EdgarConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            rate_limit_delay: Duration::from_millis(DEFAULT_RATE_LIMIT_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            www_base_url: DEFAULT_WWW_BASE_URL.to_string(),
        }
    }

    /// Reads `SEC_EDGAR_USER_AGENT` and `SEC_EDGAR_RATE_LIMIT_MS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = lookup(USER_AGENT_ENV)
            .ok_or_else(|| AppError::Config(format!("{} is not set", USER_AGENT_ENV)))?;
        let mut config = Self::new(user_agent);

        if let Some(raw) = lookup(RATE_LIMIT_ENV) {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("{} must be an integer, got '{}'", RATE_LIMIT_ENV, raw))
            })?;
            config.rate_limit_delay = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_urls(mut self, data_base_url: impl Into<String>, www_base_url: impl Into<String>) -> Self {
        self.data_base_url = data_base_url.into().trim_end_matches('/').to_string();
        self.www_base_url = www_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let ua = self.user_agent.trim();
        if ua.is_empty() {
            return Err(AppError::Config("User-Agent must not be empty".to_string()));
        }
        if !USER_AGENT_RE.is_match(ua) {
            return Err(AppError::Config(format!(
                "User-Agent '{}' must look like 'AppName/Version (contact@example.com)'",
                ua
            )));
        }
        if self.rate_limit_delay < Duration::from_millis(MIN_RATE_LIMIT_DELAY_MS) {
            return Err(AppError::Config(format!(
                "Rate limit delay {}ms is below the {}ms SEC minimum",
                self.rate_limit_delay.as_millis(),
                MIN_RATE_LIMIT_DELAY_MS
            )));
        }
        if self.timeout.is_zero() {
            return Err(AppError::Config("Request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const UA: &str = "sec-edgar-toolkit/0.1.0 (ops@example.com)";

    #[test]
    fn test_defaults_validate() {
        let config = EdgarConfig::new(UA);
        assert!(config.validate().is_ok());
        assert_eq!(config.rate_limit_delay, Duration::from_millis(100));
        assert_eq!(config.data_base_url, "https://data.sec.gov");
    }

    #[test]
    fn test_user_agent_shape() {
        assert!(EdgarConfig::new("MyApp/1.0 (me@corp.io)").validate().is_ok());
        assert!(EdgarConfig::new("").validate().is_err());
        assert!(EdgarConfig::new("MyApp 1.0 me@corp.io").validate().is_err());
        assert!(EdgarConfig::new("MyApp/1.0 (no email)").validate().is_err());
    }

    #[test]
    fn test_rate_limit_floor() {
        let config = EdgarConfig::new(UA).with_rate_limit_delay(Duration::from_millis(50));
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [(USER_AGENT_ENV, UA), (RATE_LIMIT_ENV, "250")].into_iter().collect();
        let config = EdgarConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.user_agent, UA);
        assert_eq!(config.rate_limit_delay, Duration::from_millis(250));

        let missing = EdgarConfig::from_lookup(|_| None);
        assert!(matches!(missing, Err(AppError::Config(_))));

        let bad: HashMap<&str, &str> = [(USER_AGENT_ENV, UA), (RATE_LIMIT_ENV, "fast")].into_iter().collect();
        assert!(EdgarConfig::from_lookup(|k| bad.get(k).map(|v| v.to_string())).is_err());
    }

    #[test]
    fn test_base_urls_trim_trailing_slash() {
        let config = EdgarConfig::new(UA).with_base_urls("http://localhost:8080/", "http://localhost:8081");
        assert_eq!(config.data_base_url, "http://localhost:8080");
        assert_eq!(config.www_base_url, "http://localhost:8081");
    }
}
