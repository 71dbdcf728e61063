//! Basic-auth credential handling for the AvaTax service
//!
//! The account number and license key combine into a single
//! `Authorization: Basic base64(account:license)` header value. The license
//! key is a secret: it is redacted from Debug output and never logged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

use crate::config::CredentialProvider;
use crate::{Error, Result};

/// Basic-auth token source for AvaTax requests
#[derive(Clone)]
pub struct BasicAuth {
    account: String,
    license_key: String,
}

impl BasicAuth {
    /// Create from explicit credentials
    pub fn new(account: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            license_key: license_key.into(),
        }
    }

    /// Create from a credential provider
    pub fn from_provider(provider: &dyn CredentialProvider) -> Self {
        Self::new(provider.account(), provider.license_key())
    }

    /// The `Authorization` header value
    pub fn header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.account, self.license_key));
        format!("Basic {}", token)
    }

    /// Validate that required credentials are present
    pub fn validate(&self) -> Result<()> {
        if self.account.is_empty() {
            return Err(Error::Configuration {
                message: "Avalara account number not configured".to_string(),
                source: None,
            });
        }
        if self.license_key.is_empty() {
            return Err(Error::Configuration {
                message: "Avalara license key not configured".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("account", &self.account)
            .field("license_key", &"<redacted>")
            .finish()
    }
}
