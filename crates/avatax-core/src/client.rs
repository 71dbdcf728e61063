//! Tax service facade
//!
//! [`TaxSvc`] orchestrates request construction, bounded retry, and
//! response classification per public operation. Each call follows the
//! same pipeline: build the request, send with retry, classify, return.
//! Fatal transport failures propagate as `Err`; retry exhaustion degrades
//! to an operation-specific fallback instead.

use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt;

use crate::config::{AvataxConfig, CredentialProvider};
use crate::http::builder::{Coordinates, RequestBuilder, TaxOperation};
use crate::http::error::HttpError;
use crate::http::retry::{execute_with_retry, RetryOutcome};
use crate::response::{ResponseKind, ServiceResponse};
use crate::{Error, Result};

/// Outcome of a point-estimate or ping call
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// Tax calculation is disabled or no coordinates were supplied
    Skipped,
    /// Parsed JSON estimate returned by the service
    Value(Value),
    /// Retry budget exhausted; displays as "Estimate Tax Error"
    Error,
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Skipped => write!(f, "null"),
            Estimate::Value(value) => write!(f, "{}", value),
            Estimate::Error => write!(f, "Estimate Tax Error"),
        }
    }
}

/// Client for the Avalara AvaTax service
pub struct TaxSvc {
    config: AvataxConfig,
    builder: RequestBuilder,
    client: Client,
}

impl TaxSvc {
    /// Create a client from an explicit configuration
    pub fn new(config: AvataxConfig) -> Result<Self> {
        config.validate()?;
        let builder = RequestBuilder::new(&config);
        builder.validate()?;

        let client = Client::builder()
            .connect_timeout(config.open_timeout)
            .timeout(config.read_timeout)
            .danger_accept_invalid_certs(config.tls.accept_invalid_certs())
            .build()
            .map_err(|e| Error::HttpRequest {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            config,
            builder,
            client,
        })
    }

    /// Create a client from `AVALARA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(AvataxConfig::from_env()?)
    }

    /// Compute sales tax for an order payload
    pub async fn get_tax(&self, request: &Value) -> Result<ServiceResponse> {
        log::debug!("get_tax request: {}", request);
        self.tax_operation(TaxOperation::Get, ResponseKind::GetTax, request)
            .await
    }

    /// Cancel a previously committed tax calculation
    pub async fn cancel_tax(&self, request: &Value) -> Result<ServiceResponse> {
        log::debug!("cancel_tax request: {}", request);
        self.tax_operation(TaxOperation::Cancel, ResponseKind::CancelTax, request)
            .await
    }

    /// Estimate tax for a geographic point and sale amount
    ///
    /// Short-circuits without touching the network when the feature flag
    /// is disabled or no coordinates are supplied. A missing sale amount
    /// defaults to zero. Retry exhaustion yields [`Estimate::Error`].
    pub async fn estimate_tax(
        &self,
        coordinates: Option<&Coordinates>,
        sale_amount: Option<f64>,
    ) -> Result<Estimate> {
        if !self.config.tax_calculation_enabled() {
            return Ok(Estimate::Skipped);
        }
        log::debug!("estimate_tax call");

        let Some(coordinates) = coordinates else {
            return Ok(Estimate::Skipped);
        };
        let sale_amount = sale_amount.unwrap_or(0.0);

        let outcome = execute_with_retry(
            || {
                let client = self.client.clone();
                let request = self
                    .builder
                    .estimate_request(&self.client, coordinates, sale_amount);
                async move {
                    let request = request.map_err(|e| HttpError::fatal(e.to_string()))?;
                    let response = client
                        .execute(request)
                        .await
                        .map_err(HttpError::from_request_error)?;
                    response
                        .json::<Value>()
                        .await
                        .map_err(HttpError::from_request_error)
                }
            },
            self.config.retry,
            "Estimate Tax Error",
        )
        .await?;

        match outcome {
            RetryOutcome::Completed(value) => Ok(Estimate::Value(value)),
            RetryOutcome::Exhausted(_) => Ok(Estimate::Error),
        }
    }

    /// Connectivity check against a fixed reference coordinate
    pub async fn ping(&self) -> Result<Estimate> {
        log::info!("Ping Call");
        self.estimate_tax(Some(&Coordinates::reference()), Some(0.0))
            .await
    }

    /// Validate a mailing address
    ///
    /// Retry exhaustion returns a classified response built from an empty
    /// object rather than failing the caller.
    pub async fn validate_address(&self, address: &Value) -> Result<ServiceResponse> {
        let outcome = execute_with_retry(
            || {
                let client = self.client.clone();
                let request = self.builder.address_validation_request(&self.client, address);
                async move {
                    let request = request.map_err(|e| HttpError::fatal(e.to_string()))?;
                    let response = client
                        .execute(request)
                        .await
                        .map_err(HttpError::from_request_error)?;
                    response.text().await.map_err(HttpError::from_request_error)
                }
            },
            self.config.retry,
            "Address Validation",
        )
        .await?;

        let response = match outcome {
            RetryOutcome::Completed(body) => {
                ServiceResponse::from_body(ResponseKind::AddressValidation, &body)
            }
            RetryOutcome::Exhausted(_) => {
                ServiceResponse::new(ResponseKind::AddressValidation, Value::Object(Map::new()))
            }
        };
        Ok(response)
    }

    /// Shared POST pipeline for tax calculation and cancellation
    ///
    /// On retry exhaustion the raw result is `Value::Null`, which the
    /// classifier flags as an error response.
    async fn tax_operation(
        &self,
        operation: TaxOperation,
        kind: ResponseKind,
        payload: &Value,
    ) -> Result<ServiceResponse> {
        let outcome = execute_with_retry(
            || {
                let client = self.client.clone();
                let request = self.builder.tax_request(&self.client, operation, payload);
                async move {
                    let request = request.map_err(|e| HttpError::fatal(e.to_string()))?;
                    let response = client
                        .execute(request)
                        .await
                        .map_err(HttpError::from_request_error)?;
                    response
                        .json::<Value>()
                        .await
                        .map_err(HttpError::from_request_error)
                }
            },
            self.config.retry,
            "Avalara Request Error",
        )
        .await?;

        let raw = match outcome {
            RetryOutcome::Completed(value) => value,
            RetryOutcome::Exhausted(_) => Value::Null,
        };
        Ok(ServiceResponse::new(kind, raw))
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &AvataxConfig {
        &self.config
    }
}
