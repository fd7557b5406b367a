use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const CONVERT_URL: &str = "https://api.exchangeratesapi.io/v1/convert";

/// Currency conversion wrapper. The rate math is the provider's business;
/// this crate only forwards the request and unwraps the result.
pub struct ExchangeRateFetcher {
    api_key: String,
    client: Client,
}

#[derive(Deserialize)]
struct ConvertResponse {
    success: bool,
    result: Option<f64>,
    error: Option<Value>,
}

impl ExchangeRateFetcher {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client }
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<f64> {
        debug!("Converting {} {} -> {}", amount, from, to);

        let resp = self
            .client
            .get(CONVERT_URL)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("from", from),
                ("to", to),
            ])
            .query(&[("amount", amount)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!("Exchange rate API error: {}", resp.status()));
        }

        let json: Value = resp.json().await?;
        Self::parse_conversion(&json)
    }

    fn parse_conversion(json: &Value) -> Result<f64> {
        let resp: ConvertResponse = serde_json::from_value(json.clone())?;

        if !resp.success {
            let detail = resp
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(anyhow!("Exchange rate API refused the request: {}", detail));
        }

        resp.result
            .ok_or_else(|| anyhow!("Exchange rate response is missing a result"))
    }
}
