//! HTTP layer for AvaTax service communication
//!
//! This module provides:
//! - Request building for the tax, estimate, and address endpoints
//! - Basic-auth credential handling
//! - Transport error classification against the transient allow-list
//! - Bounded immediate retry with a tagged outcome
//! - TLS certificate-validation toggle

pub mod auth;
pub mod builder;
pub mod error;
pub mod retry;
pub mod tls;

pub use auth::BasicAuth;
pub use builder::{Coordinates, RequestBuilder, TaxOperation};
pub use error::{ErrorClassification, HttpError, TransientKind};
pub use retry::{execute_with_retry, RetryOutcome, RetryPolicy};
pub use tls::TlsConfig;
