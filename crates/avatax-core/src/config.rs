//! Client configuration
//!
//! The original integration read service settings from ambient global
//! state on every call; here everything lives in an explicit
//! [`AvataxConfig`] handed to the client constructor and held read-only
//! for its lifetime.

use std::env;
use std::time::Duration;

use crate::http::retry::RetryPolicy;
use crate::http::tls::TlsConfig;
use crate::{Error, Result};

/// Supplies service credentials and the tax-calculation feature flag
pub trait CredentialProvider: Send + Sync {
    /// Service base endpoint, without a trailing slash
    fn endpoint(&self) -> &str;
    /// Avalara account number
    fn account(&self) -> &str;
    /// Avalara license key
    fn license_key(&self) -> &str;
    /// Whether tax calculation is enabled for this installation
    fn tax_calculation_enabled(&self) -> bool;
}

/// Configuration for the AvaTax client
#[derive(Debug, Clone)]
pub struct AvataxConfig {
    /// Service base endpoint
    pub endpoint: String,
    /// Avalara account number
    pub account: String,
    /// Avalara license key
    pub license_key: String,
    /// Feature flag gating estimate/ping calls
    pub tax_calculation_enabled: bool,
    /// Connection-open timeout
    pub open_timeout: Duration,
    /// Response-read timeout
    pub read_timeout: Duration,
    /// Retry policy for transient transport failures
    pub retry: RetryPolicy,
    /// TLS certificate-validation toggle
    pub tls: TlsConfig,
}

impl AvataxConfig {
    /// Create a configuration with default timeouts, retry, and TLS settings
    pub fn new(
        endpoint: impl Into<String>,
        account: impl Into<String>,
        license_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            account: account.into(),
            license_key: license_key.into(),
            tax_calculation_enabled: true,
            open_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(6),
            retry: RetryPolicy::default(),
            tls: TlsConfig::default(),
        }
    }

    /// Load configuration from `AVALARA_*` environment variables
    ///
    /// Honors a `.env` file when present. `AVALARA_ENDPOINT`,
    /// `AVALARA_ACCOUNT`, and `AVALARA_LICENSE_KEY` are required;
    /// timeouts and the retry budget fall back to the service defaults
    /// (open 2s, read 6s, 2 attempts).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let endpoint = require_env("AVALARA_ENDPOINT")?;
        let account = require_env("AVALARA_ACCOUNT")?;
        let license_key = require_env("AVALARA_LICENSE_KEY")?;

        let mut config = Self::new(endpoint, account, license_key);
        config.tax_calculation_enabled = env_bool("AVALARA_TAX_CALCULATION", true);
        config.open_timeout = Duration::from_secs(env_u64("AVALARA_OPEN_TIMEOUT", 2));
        config.read_timeout = Duration::from_secs(env_u64("AVALARA_READ_TIMEOUT", 6));
        config.retry = RetryPolicy::new(env_u64("AVALARA_RETRY", 2) as u32);
        Ok(config)
    }

    /// Set the feature flag
    pub fn with_tax_calculation_enabled(mut self, enabled: bool) -> Self {
        self.tax_calculation_enabled = enabled;
        self
    }

    /// Set the retry budget
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the TLS toggle
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Set both timeouts
    pub fn with_timeouts(mut self, open: Duration, read: Duration) -> Self {
        self.open_timeout = open;
        self.read_timeout = read;
        self
    }

    /// Validate that the configuration can produce requests
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::Configuration {
                message: "Avalara endpoint not configured".to_string(),
                source: None,
            });
        }
        url::Url::parse(&self.endpoint).map_err(|e| Error::Configuration {
            message: format!("Invalid Avalara endpoint: {}", self.endpoint),
            source: Some(anyhow::Error::from(e)),
        })?;
        Ok(())
    }
}

impl CredentialProvider for AvataxConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn account(&self) -> &str {
        &self.account
    }

    fn license_key(&self) -> &str {
        &self.license_key
    }

    fn tax_calculation_enabled(&self) -> bool {
        self.tax_calculation_enabled
    }
}

fn normalize_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Configuration {
        message: format!("Environment variable {} not found", name),
        source: None,
    })
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{} is not a number, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => !matches!(raw.trim().to_lowercase().as_str(), "false" | "0" | "no"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let config = AvataxConfig::new("https://development.avalara.net", "12345", "key");
        assert_eq!(config.open_timeout, Duration::from_secs(2));
        assert_eq!(config.read_timeout, Duration::from_secs(6));
        assert_eq!(config.retry.max_attempts, 2);
        assert!(config.tax_calculation_enabled);
    }

    #[test]
    fn test_endpoint_trailing_slash_normalized() {
        let config = AvataxConfig::new("https://development.avalara.net/", "12345", "key");
        assert_eq!(config.endpoint, "https://development.avalara.net");
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = AvataxConfig::new("not a url", "12345", "key");
        assert!(config.validate().is_err());

        let config = AvataxConfig::new("", "12345", "key");
        assert!(config.validate().is_err());

        let config = AvataxConfig::new("https://development.avalara.net", "12345", "key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credential_provider_impl() {
        let config = AvataxConfig::new("https://development.avalara.net", "12345", "key")
            .with_tax_calculation_enabled(false);
        let provider: &dyn CredentialProvider = &config;
        assert_eq!(provider.endpoint(), "https://development.avalara.net");
        assert_eq!(provider.account(), "12345");
        assert_eq!(provider.license_key(), "key");
        assert!(!provider.tax_calculation_enabled());
    }

    #[test]
    fn test_env_overrides() {
        // Save original values for restoration
        let originals: Vec<_> = ["AVALARA_OPEN_TIMEOUT", "AVALARA_READ_TIMEOUT", "AVALARA_RETRY"]
            .into_iter()
            .map(|name| (name, env::var(name).ok()))
            .collect();

        env::set_var("AVALARA_OPEN_TIMEOUT", "5");
        env::set_var("AVALARA_READ_TIMEOUT", "12");
        env::set_var("AVALARA_RETRY", "4");

        assert_eq!(env_u64("AVALARA_OPEN_TIMEOUT", 2), 5);
        assert_eq!(env_u64("AVALARA_READ_TIMEOUT", 6), 12);
        assert_eq!(env_u64("AVALARA_RETRY", 2), 4);

        for (name, original) in originals {
            match original {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let original = env::var("AVALARA_TAX_CALCULATION").ok();

        env::set_var("AVALARA_TAX_CALCULATION", "false");
        assert!(!env_bool("AVALARA_TAX_CALCULATION", true));
        env::set_var("AVALARA_TAX_CALCULATION", "true");
        assert!(env_bool("AVALARA_TAX_CALCULATION", true));
        env::remove_var("AVALARA_TAX_CALCULATION");
        assert!(env_bool("AVALARA_TAX_CALCULATION", true));

        if let Some(value) = original {
            env::set_var("AVALARA_TAX_CALCULATION", value);
        }
    }
}
