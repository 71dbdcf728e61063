//! HTTP request construction for the AvaTax wire protocol
//!
//! Builds method-specific requests: POSTs to the tax service for
//! calculation and cancellation, GETs for address validation and
//! point estimates. Every request carries the Basic-auth header.

use std::collections::BTreeMap;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CredentialProvider;
use crate::http::auth::BasicAuth;
use crate::{Error, Result};

/// Tax service path prefix
pub const TAX_SERVICE_PATH: &str = "/tax/";
/// Address service path prefix
pub const ADDRESS_SERVICE_PATH: &str = "/address/";

/// A latitude/longitude pair as decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinates {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Fixed reference point used by connectivity checks
    pub fn reference() -> Self {
        Self::new("40.714623", "-74.006605")
    }
}

/// Tax service operations sharing the POST pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxOperation {
    Get,
    Cancel,
}

impl TaxOperation {
    /// Path segment appended to the tax service prefix
    pub fn path_segment(&self) -> &'static str {
        match self {
            TaxOperation::Get => "get",
            TaxOperation::Cancel => "cancel",
        }
    }
}

/// Builder for AvaTax service requests
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    auth: BasicAuth,
}

impl RequestBuilder {
    /// Create a builder from a credential provider
    pub fn new(provider: &dyn CredentialProvider) -> Self {
        Self {
            base_url: provider.endpoint().trim_end_matches('/').to_string(),
            auth: BasicAuth::from_provider(provider),
        }
    }

    /// POST `{endpoint}/tax/{get|cancel}` with a JSON payload
    pub fn tax_request(
        &self,
        client: &Client,
        operation: TaxOperation,
        payload: &Value,
    ) -> Result<Request> {
        let url = self.parse_url(format!(
            "{}{}{}",
            self.base_url,
            TAX_SERVICE_PATH,
            operation.path_segment()
        ))?;

        client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.auth.header_value())
            .json(payload)
            .build()
            .map_err(|e| Error::HttpRequest {
                message: format!("Failed to build tax request: {}", e),
                source: Some(Box::new(e)),
            })
    }

    /// GET `{endpoint}/tax/{lat},{lon}/get?saleamount={amount}`
    pub fn estimate_request(
        &self,
        client: &Client,
        coordinates: &Coordinates,
        sale_amount: f64,
    ) -> Result<Request> {
        let mut url = self.parse_url(format!(
            "{}{}{},{}/get",
            self.base_url, TAX_SERVICE_PATH, coordinates.latitude, coordinates.longitude
        ))?;
        url.query_pairs_mut()
            .append_pair("saleamount", &sale_amount.to_string());

        client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.auth.header_value())
            .build()
            .map_err(|e| Error::HttpRequest {
                message: format!("Failed to build estimate request: {}", e),
                source: Some(Box::new(e)),
            })
    }

    /// GET `{endpoint}/address/validate?{address fields}`
    ///
    /// Address fields are query-encoded in sorted key order so the same
    /// address always produces the same URL.
    pub fn address_validation_request(&self, client: &Client, address: &Value) -> Result<Request> {
        let fields = address.as_object().ok_or_else(|| Error::HttpRequest {
            message: "Address payload must be a JSON object".to_string(),
            source: None,
        })?;

        let mut url = self.parse_url(format!("{}{}validate", self.base_url, ADDRESS_SERVICE_PATH))?;
        {
            let mut pairs = url.query_pairs_mut();
            let sorted: BTreeMap<&String, &Value> = fields.iter().collect();
            for (key, value) in sorted {
                pairs.append_pair(key, &query_value(value));
            }
        }

        client
            .get(url)
            .header(AUTHORIZATION, self.auth.header_value())
            .build()
            .map_err(|e| Error::HttpRequest {
                message: format!("Failed to build address validation request: {}", e),
                source: Some(Box::new(e)),
            })
    }

    /// Validate that the builder can produce authenticated requests
    pub fn validate(&self) -> Result<()> {
        self.auth.validate()?;
        self.parse_url(format!("{}{}", self.base_url, TAX_SERVICE_PATH))?;
        Ok(())
    }

    fn parse_url(&self, raw: String) -> Result<Url> {
        Url::parse(&raw).map_err(|e| Error::HttpRequest {
            message: format!("Invalid request URL: {}", raw),
            source: Some(Box::new(e)),
        })
    }
}

/// Render a JSON value as a query-string value
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AvataxConfig;
    use serde_json::json;

    fn builder() -> RequestBuilder {
        let config = AvataxConfig::new("https://development.avalara.net", "12345", "key");
        RequestBuilder::new(&config)
    }

    #[test]
    fn test_tax_request_url_and_headers() {
        let client = Client::new();
        let payload = json!({"DocCode": "ORDER-1"});
        let request = builder()
            .tax_request(&client, TaxOperation::Get, &payload)
            .unwrap();

        assert_eq!(*request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://development.avalara.net/tax/get"
        );
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(request
            .headers()
            .get(AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("Basic "));

        let body = request.body().unwrap().as_bytes().unwrap();
        let round_trip: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(round_trip, payload);
    }

    #[test]
    fn test_cancel_path() {
        let client = Client::new();
        let request = builder()
            .tax_request(&client, TaxOperation::Cancel, &json!({}))
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://development.avalara.net/tax/cancel"
        );
    }

    #[test]
    fn test_estimate_request_url() {
        let client = Client::new();
        let request = builder()
            .estimate_request(&client, &Coordinates::reference(), 0.0)
            .unwrap();

        assert_eq!(*request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://development.avalara.net/tax/40.714623,-74.006605/get?saleamount=0"
        );
        assert!(request.headers().contains_key(AUTHORIZATION));
        assert!(request.headers().contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_address_validation_query_sorted() {
        let client = Client::new();
        let address = json!({
            "Line1": "118 N Clark St",
            "City": "Chicago",
            "Region": "IL",
            "PostalCode": "60602"
        });
        let request = builder()
            .address_validation_request(&client, &address)
            .unwrap();

        assert_eq!(*request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/address/validate");
        // Sorted key order
        assert_eq!(
            request.url().query().unwrap(),
            "City=Chicago&Line1=118+N+Clark+St&PostalCode=60602&Region=IL"
        );
        // Address validation carries auth only
        assert!(request.headers().contains_key(AUTHORIZATION));
        assert!(!request.headers().contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_address_validation_rejects_non_object() {
        let client = Client::new();
        let result = builder().address_validation_request(&client, &json!("line1"));
        assert!(matches!(result, Err(Error::HttpRequest { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let config = AvataxConfig::new("https://development.avalara.net", "", "key");
        assert!(RequestBuilder::new(&config).validate().is_err());
    }
}
