use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::error::ConvertError;
use crate::rates::{RateProvider, RateTable};

/// Client for the exchangerate-api.com v6 `latest` wire format.
///
/// `base_url` is the full endpoint prefix up to and including `latest`;
/// the lowercased base code is appended per the API convention.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(default)]
    conversion_rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "RateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ConvertError> {
        let url = format!("{}/{}", self.base_url, base.to_lowercase());
        debug!("Requesting rate table from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConvertError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::Http(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ConvertError::Network(e.to_string()))?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| ConvertError::Api(format!("Invalid rate response: {e}")))?;

        if data.result != "success" {
            return Err(ConvertError::Api(
                data.error_type
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            ));
        }

        let rates = data
            .conversion_rates
            .ok_or_else(|| ConvertError::Api("Unknown API error".to_string()))?;
        debug!(count = rates.len(), "Received rate table");

        Ok(RateTable::new(rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_server(base_path: &str, template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(base_path))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_successful_fetch_lowercases_base() {
        let body = r#"{
            "result": "success",
            "conversion_rates": {"EUR": 0.92, "GBP": 0.79}
        }"#;
        // The mounted path is lowercase; an uppercase request would 404.
        let server = mock_server("/usd", ResponseTemplate::new(200).set_body_string(body)).await;

        let provider = ExchangeRateApiProvider::new(&server.uri());
        let table = provider.fetch_rates("USD").await.unwrap();

        assert_eq!(table.rate("EUR"), Some(0.92));
        assert_eq!(table.rate("GBP"), Some(0.79));
        assert_eq!(table.rate("JPY"), None);
    }

    #[tokio::test]
    async fn test_http_error_carries_status() {
        let server = mock_server("/usd", ResponseTemplate::new(500)).await;

        let provider = ExchangeRateApiProvider::new(&server.uri());
        let err = provider.fetch_rates("USD").await.unwrap_err();

        assert!(matches!(err, ConvertError::Http(500)));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_api_failure_uses_supplied_reason() {
        let body = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let server = mock_server("/xxx", ResponseTemplate::new(200).set_body_string(body)).await;

        let provider = ExchangeRateApiProvider::new(&server.uri());
        let err = provider.fetch_rates("XXX").await.unwrap_err();

        assert_eq!(err.to_string(), "unsupported-code");
    }

    #[tokio::test]
    async fn test_api_failure_without_reason_is_generic() {
        let body = r#"{"result": "error"}"#;
        let server = mock_server("/usd", ResponseTemplate::new(200).set_body_string(body)).await;

        let provider = ExchangeRateApiProvider::new(&server.uri());
        let err = provider.fetch_rates("USD").await.unwrap_err();

        assert_eq!(err.to_string(), "Unknown API error");
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_api_error() {
        let server =
            mock_server("/usd", ResponseTemplate::new(200).set_body_string("not json")).await;

        let provider = ExchangeRateApiProvider::new(&server.uri());
        let err = provider.fetch_rates("USD").await.unwrap_err();

        assert!(matches!(err, ConvertError::Api(_)));
        assert!(err.to_string().starts_with("Invalid rate response:"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        // Nothing listens on this port.
        let provider = ExchangeRateApiProvider::new("http://127.0.0.1:9");
        let err = provider.fetch_rates("USD").await.unwrap_err();

        assert!(matches!(err, ConvertError::Network(_)));
    }
}
