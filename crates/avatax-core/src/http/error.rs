//! Transport error classification
//!
//! Maps low-level request failures onto the fixed allow-list of transient
//! kinds that the retry executor is willing to retry. Anything outside the
//! allow-list is fatal and propagates to the caller without retry.

use std::fmt;
use std::io;

/// Transient failure kinds forming the retry allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    /// Connection-open or response-read timeout
    Timeout,
    /// Connection reset by peer
    ConnectionReset,
    /// Connection refused
    ConnectionRefused,
    /// Invalid-argument failure at the socket layer
    InvalidInput,
    /// Unexpected end-of-input while reading the response
    UnexpectedEof,
    /// Malformed HTTP response
    BadResponse,
    /// Malformed HTTP header syntax
    BadHeaderSyntax,
    /// Generic protocol-level failure
    Protocol,
}

/// Classification of transport errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// On the allow-list; retried up to the configured budget
    Transient(TransientKind),
    /// Off the allow-list; propagates immediately
    Fatal,
}

impl ErrorClassification {
    /// Check if this error type should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorClassification::Transient(_))
    }
}

/// Classified transport error
#[derive(Debug)]
pub struct HttpError {
    /// Classification for retry logic
    pub classification: ErrorClassification,
    /// Human-readable error message
    pub message: String,
}

impl HttpError {
    /// Create a transient error of the given kind
    pub fn transient(kind: TransientKind, message: impl Into<String>) -> Self {
        Self {
            classification: ErrorClassification::Transient(kind),
            message: message.into(),
        }
    }

    /// Create a fatal error that must not be retried
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            classification: ErrorClassification::Fatal,
            message: message.into(),
        }
    }

    /// Classify a reqwest error into the transient allow-list or fatal
    pub fn from_request_error(error: reqwest::Error) -> Self {
        let classification = classify_request_error(&error);
        Self {
            classification,
            message: error.to_string(),
        }
    }

    /// Check if this error should trigger a retry
    pub fn is_transient(&self) -> bool {
        self.classification.is_retryable()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.classification)
    }
}

impl std::error::Error for HttpError {}

/// Convert a fatal HttpError to the crate Error
impl From<HttpError> for crate::Error {
    fn from(http_error: HttpError) -> Self {
        crate::Error::Http {
            message: http_error.message.clone(),
            source: Some(anyhow::anyhow!("{:?}", http_error.classification)),
        }
    }
}

fn classify_request_error(error: &reqwest::Error) -> ErrorClassification {
    if error.is_timeout() {
        return ErrorClassification::Transient(TransientKind::Timeout);
    }

    // Socket-level failures surface as io::Error somewhere in the chain.
    // An io failure off the allow-list (DNS resolution, TLS certificate
    // rejection) is fatal.
    if let Some(kind) = io_error_kind(error) {
        return match classify_io_kind(kind) {
            Some(transient) => ErrorClassification::Transient(transient),
            None => ErrorClassification::Fatal,
        };
    }

    if error.is_body() {
        // Response framing broke mid-stream without a socket-level cause
        return ErrorClassification::Transient(TransientKind::BadResponse);
    }

    // Everything else, including JSON decoding of a well-formed response,
    // propagates on the first attempt
    ErrorClassification::Fatal
}

/// Map an io error kind onto the transient allow-list
pub fn classify_io_kind(kind: io::ErrorKind) -> Option<TransientKind> {
    match kind {
        io::ErrorKind::TimedOut => Some(TransientKind::Timeout),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            Some(TransientKind::ConnectionReset)
        }
        io::ErrorKind::ConnectionRefused => Some(TransientKind::ConnectionRefused),
        io::ErrorKind::InvalidInput => Some(TransientKind::InvalidInput),
        io::ErrorKind::UnexpectedEof => Some(TransientKind::UnexpectedEof),
        _ => None,
    }
}

/// Walk the error and its source chain looking for an io::Error
fn io_error_kind(error: &(dyn std::error::Error + 'static)) -> Option<io::ErrorKind> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds_are_retryable() {
        let kinds = [
            TransientKind::Timeout,
            TransientKind::ConnectionReset,
            TransientKind::ConnectionRefused,
            TransientKind::InvalidInput,
            TransientKind::UnexpectedEof,
            TransientKind::BadResponse,
            TransientKind::BadHeaderSyntax,
            TransientKind::Protocol,
        ];
        for kind in kinds {
            assert!(ErrorClassification::Transient(kind).is_retryable());
        }
    }

    #[test]
    fn test_fatal_is_not_retryable() {
        assert!(!ErrorClassification::Fatal.is_retryable());
        assert!(!HttpError::fatal("request body cannot be built").is_transient());
    }

    #[test]
    fn test_io_kind_classification() {
        assert_eq!(
            classify_io_kind(io::ErrorKind::ConnectionReset),
            Some(TransientKind::ConnectionReset)
        );
        assert_eq!(
            classify_io_kind(io::ErrorKind::ConnectionRefused),
            Some(TransientKind::ConnectionRefused)
        );
        assert_eq!(
            classify_io_kind(io::ErrorKind::InvalidInput),
            Some(TransientKind::InvalidInput)
        );
        assert_eq!(
            classify_io_kind(io::ErrorKind::UnexpectedEof),
            Some(TransientKind::UnexpectedEof)
        );
        assert_eq!(
            classify_io_kind(io::ErrorKind::TimedOut),
            Some(TransientKind::Timeout)
        );
        // Off the allow-list; rustls surfaces certificate rejection as
        // InvalidData, which must stay fatal
        assert_eq!(classify_io_kind(io::ErrorKind::InvalidData), None);
        assert_eq!(classify_io_kind(io::ErrorKind::PermissionDenied), None);
        assert_eq!(classify_io_kind(io::ErrorKind::NotFound), None);
    }

    #[test]
    fn test_io_error_chain_walk() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        let wrapped = anyhow::Error::from(io_err);
        let kind = io_error_kind(wrapped.as_ref());
        assert_eq!(kind, Some(io::ErrorKind::ConnectionReset));
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::transient(TransientKind::Timeout, "connection timed out");
        assert!(err.to_string().contains("connection timed out"));
        assert!(err.is_transient());
    }
}
