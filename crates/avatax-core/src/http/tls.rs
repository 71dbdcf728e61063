//! TLS configuration for the AvaTax client
//!
//! Certificate verification is an explicit toggle. The default matches the
//! reference deployment behavior (verification off, tolerating the
//! self-signed certificates on Avalara sandbox endpoints); production
//! callers should opt into [`TlsConfig::secure`].

use serde::{Deserialize, Serialize};

/// TLS configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether to validate server certificates
    pub validate_certificates: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self::insecure()
    }
}

impl TlsConfig {
    /// Verify server certificates against the system trust store
    pub fn secure() -> Self {
        Self {
            validate_certificates: true,
        }
    }

    /// Accept any certificate, including self-signed ones
    pub fn insecure() -> Self {
        Self {
            validate_certificates: false,
        }
    }

    /// Whether the underlying client should accept invalid certificates
    pub fn accept_invalid_certs(&self) -> bool {
        !self.validate_certificates
    }
}
