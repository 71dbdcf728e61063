//! avatax-core - Resilient client for the Avalara AvaTax service
//!
//! Computes sales tax for orders, cancels committed calculations,
//! estimates tax for a geographic point, and validates mailing addresses,
//! with bounded automatic retry against an unreliable network and
//! classification of service responses into success/error outcomes.
//!
//! # Main Components
//!
//! - **Configuration**: explicit [`AvataxConfig`] (no ambient globals)
//! - **HTTP Layer**: request building, Basic auth, transient-error
//!   classification, bounded immediate retry, TLS toggle
//! - **Response Classification**: [`ServiceResponse`] pairs raw payloads
//!   with a derived error flag; service errors are data, not exceptions
//!
//! # Example
//!
//! ```no_run
//! use avatax_core::{AvataxConfig, Result, TaxSvc};
//!
//! async fn example() -> Result<()> {
//!     let config = AvataxConfig::new("https://development.avalara.net", "12345", "license");
//!     let svc = TaxSvc::new(config)?;
//!     let response = svc.get_tax(&serde_json::json!({"DocCode": "ORDER-1"})).await?;
//!     if response.is_error() {
//!         // inspect response.result() for the service's error detail
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;

// Re-export main types for convenience
pub use client::{Estimate, TaxSvc};
pub use config::{AvataxConfig, CredentialProvider};
pub use error::{Error, Result};
pub use http::{
    BasicAuth, Coordinates, ErrorClassification, HttpError, RequestBuilder, RetryOutcome,
    RetryPolicy, TaxOperation, TlsConfig, TransientKind,
};
pub use response::{ResponseKind, ServiceResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
