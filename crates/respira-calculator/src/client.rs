//! HTTP client for the calculation service.
//!
//! One request per call, no retries. The timeout comes from
//! [`CalculatorConfig::timeout_ms`] and covers the whole request.

use std::time::Duration;

use respira_engagement::CalculatorConfig;

use crate::contract::{Activity, CalculationResponse};
use crate::error::CalculatorError;

/// Client for `POST {base_url}/api/calculate/*`.
#[derive(Debug, Clone)]
pub struct CalculatorClient {
    client: reqwest::Client,
    base_url: String,
}

impl CalculatorClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CalculatorConfig) -> Result<Self, CalculatorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the service for the emissions of `activity`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::Http`] if no response arrived,
    /// [`CalculatorError::Status`] for a non-2xx answer, or
    /// [`CalculatorError::Parse`] for an unreadable body.
    pub async fn calculate(&self, activity: &Activity) -> Result<CalculationResponse, CalculatorError> {
        let url = format!("{}{}", self.base_url, activity.path());
        let request = self.client.post(&url);
        let request = match activity {
            Activity::Transport(body) => request.json(body),
            Activity::Energy(body) => request.json(body),
            Activity::Food(body) => request.json(body),
        };

        tracing::debug!(%url, category = %activity.category(), "Requesting emission calculation");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            tracing::warn!(%url, status = status.as_u16(), %body, "Calculation rejected");
            return Err(CalculatorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| CalculatorError::Parse(format!("{e} in body {text:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_trimmed() {
        let config = CalculatorConfig {
            base_url: "http://localhost:8000/".to_owned(),
            timeout_ms: 500,
        };
        let client = CalculatorClient::new(&config);
        assert_eq!(
            client.as_ref().map(CalculatorClient::base_url).ok(),
            Some("http://localhost:8000")
        );
    }
}
