use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::IndicatorSource;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{Metric, RawObservation, YearRange};

const BASE_URL: &str = "https://api.worldbank.org/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct WorldBankFetcher {
    client: Client,
}

impl WorldBankFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// World Bank responses are positional: `[Metadata, [Records...]]`.
    /// Null values survive into the raw observations; dropping them is the
    /// normalizer's job.
    fn parse_observations(json: &Value) -> PipelineResult<Vec<RawObservation>> {
        let rows = json
            .as_array()
            .and_then(|arr| arr.get(1))
            .and_then(|val| val.as_array())
            .ok_or_else(|| {
                PipelineError::Transport("Invalid World Bank API response format".into())
            })?;

        let mut observations = Vec::new();

        for obs in rows {
            // "date": "2023", "value": 123.45 (or null, or sometimes "123.45")
            let Some(period) = obs["date"].as_str().and_then(|d| d.parse::<i32>().ok()) else {
                continue;
            };

            let value = match &obs["value"] {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };

            observations.push(RawObservation { period, value });
        }

        Ok(observations)
    }

    /// One record per country for a single year, keyed by ISO3 code. Values
    /// stay unscaled: the choropleth thresholds are in raw USD.
    fn parse_snapshot(json: &Value) -> PipelineResult<BTreeMap<String, f64>> {
        let rows = json
            .as_array()
            .and_then(|arr| arr.get(1))
            .and_then(|val| val.as_array())
            .ok_or_else(|| {
                PipelineError::Transport("Invalid World Bank API response format".into())
            })?;

        let mut snapshot = BTreeMap::new();

        for obs in rows {
            let Some(iso3) = obs["countryiso3code"].as_str().filter(|c| !c.is_empty()) else {
                continue;
            };
            let Some(value) = obs["value"].as_f64() else {
                continue;
            };
            snapshot.insert(iso3.to_string(), value);
        }

        Ok(snapshot)
    }

    /// All-country snapshot for the world map.
    pub async fn fetch_world_snapshot(
        &self,
        metric: Metric,
        year: i32,
    ) -> PipelineResult<BTreeMap<String, f64>> {
        let url = format!(
            "{}/country/all/indicator/{}?format=json&date={}&per_page=400",
            BASE_URL,
            metric.indicator_code(),
            year
        );

        let json = self.get_json(&url).await?;
        Self::parse_snapshot(&json)
    }

    async fn get_json(&self, url: &str) -> PipelineResult<Value> {
        debug!("Fetching World Bank data: {}", url);

        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(PipelineError::Transport(format!(
                "World Bank API error: {}",
                resp.status()
            )));
        }

        Ok(resp.json().await?)
    }
}

impl Default for WorldBankFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndicatorSource for WorldBankFetcher {
    fn name(&self) -> &str {
        "worldbank"
    }

    async fn fetch_observations(
        &self,
        country: &str,
        metric: Metric,
        range: Option<YearRange>,
    ) -> PipelineResult<Vec<RawObservation>> {
        let mut url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page=1000",
            BASE_URL,
            country,
            metric.indicator_code()
        );

        if let Some(range) = range {
            url.push_str(&format!("&date={}:{}", range.start, range.end));
        }

        let json = self.get_json(&url).await?;
        Self::parse_observations(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wb_response() {
        let json_data = json!([
            { "page": 1, "pages": 1, "per_page": 50, "total": 3 },
            [
                { "indicator": { "id": "NY.GDP.MKTP.CD", "value": "GDP" }, "country": { "id": "IN", "value": "India" }, "countryiso3code": "IND", "date": "2020", "value": 2.66e12, "unit": "", "obs_status": "", "decimal": 1 },
                { "indicator": { "id": "NY.GDP.MKTP.CD", "value": "GDP" }, "country": { "id": "IN", "value": "India" }, "countryiso3code": "IND", "date": "2019", "value": null, "unit": "", "obs_status": "", "decimal": 1 },
                { "indicator": { "id": "NY.GDP.MKTP.CD", "value": "GDP" }, "country": { "id": "IN", "value": "India" }, "countryiso3code": "IND", "date": "2018", "value": "2710000000000", "unit": "", "obs_status": "", "decimal": 1 }
            ]
        ]);

        let observations = WorldBankFetcher::parse_observations(&json_data).unwrap();
        assert_eq!(observations.len(), 3);

        // Provider order is preserved here (newest first); sorting is the
        // normalizer's job.
        assert_eq!(observations[0].period, 2020);
        assert_eq!(observations[0].value, Some(2.66e12));
        assert_eq!(observations[1].value, None);
        assert_eq!(observations[2].value, Some(2.71e12)); // string value parsed
    }

    #[test]
    fn test_parse_invalid_format() {
        let json_data = json!({ "message": "bad request" });
        let result = WorldBankFetcher::parse_observations(&json_data);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_snapshot_skips_unusable_rows() {
        let json_data = json!([
            { "page": 1, "pages": 1, "per_page": 400, "total": 4 },
            [
                { "country": { "id": "IN" }, "countryiso3code": "IND", "date": "2021", "value": 3.18e12 },
                { "country": { "id": "US" }, "countryiso3code": "USA", "date": "2021", "value": 2.33e13 },
                { "country": { "id": "XK" }, "countryiso3code": "", "date": "2021", "value": 9.4e9 },
                { "country": { "id": "PR" }, "countryiso3code": "PRI", "date": "2021", "value": null }
            ]
        ]);

        let snapshot = WorldBankFetcher::parse_snapshot(&json_data).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["IND"], 3.18e12);
        assert_eq!(snapshot["USA"], 2.33e13);
    }
}
