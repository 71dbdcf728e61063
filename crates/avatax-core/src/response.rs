//! Classified service responses
//!
//! Every public operation returns a [`ServiceResponse`]: the raw parsed
//! payload paired with a derived error flag and an operation label.
//! Service-reported failures are surfaced as data through `is_error`,
//! never as raised errors, so callers act on a structured result without
//! inspecting raw payloads.

use serde_json::Value;
use std::fmt;

/// Which operation produced a response; determines the error predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    GetTax,
    CancelTax,
    AddressValidation,
}

impl ResponseKind {
    /// Human-readable label used in log messages
    pub fn description(&self) -> &'static str {
        match self {
            ResponseKind::GetTax => "Get Tax",
            ResponseKind::CancelTax => "Cancel Tax",
            ResponseKind::AddressValidation => "Address Validation",
        }
    }
}

/// The classified result of a service call
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    kind: ResponseKind,
    result: Value,
    is_error: bool,
}

impl ServiceResponse {
    /// Classify a raw payload for the given operation
    ///
    /// Logs the payload at error level when classified as an error, at
    /// debug level otherwise. The response is always returned; `is_error`
    /// is the failure signal.
    pub fn new(kind: ResponseKind, result: Value) -> Self {
        let is_error = classify(kind, &result);
        if is_error {
            log::error!("{} Error: {}", kind.description(), result);
        } else {
            log::debug!("{} Response: {}", kind.description(), result);
        }
        Self {
            kind,
            result,
            is_error,
        }
    }

    /// Classify a raw response body, tolerating unparseable input
    pub fn from_body(kind: ResponseKind, body: &str) -> Self {
        let result = serde_json::from_str(body).unwrap_or(Value::Null);
        Self::new(kind, result)
    }

    /// The raw parsed payload; `Value::Null` when the transport degraded
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Whether the payload matched the service's error-indicating shape
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// The operation label for log messages
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    /// The operation kind
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }
}

impl fmt::Display for ServiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description(), self.result)
    }
}

fn classify(kind: ResponseKind, result: &Value) -> bool {
    match kind {
        ResponseKind::GetTax | ResponseKind::CancelTax => tax_error(result),
        // An empty payload from address validation is an error too
        ResponseKind::AddressValidation => {
            tax_error(result) || result.as_object().is_some_and(|map| map.is_empty())
        }
    }
}

/// The tax service's error envelope: an `error` key or `ResultCode: Error`
fn tax_error(result: &Value) -> bool {
    match result.as_object() {
        Some(map) => {
            map.contains_key("error")
                || map.get("ResultCode").and_then(Value::as_str) == Some("Error")
        }
        // Null and other non-object payloads carry no usable result
        None => true,
    }
}
