use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const COUNTRIES_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";

/// Fetches the world-countries FeatureCollection the map view draws. The
/// geometry itself is an opaque blob; only the feature id (ISO3) is ever
/// inspected, to join features against indicator snapshots.
pub struct GeometryFetcher {
    client: Client,
}

impl GeometryFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    pub async fn fetch_countries(&self) -> Result<Value> {
        debug!("Fetching world geometry: {}", COUNTRIES_GEOJSON_URL);

        let resp = self.client.get(COUNTRIES_GEOJSON_URL).send().await?;

        if !resp.status().is_success() {
            return Err(anyhow!("GeoJSON fetch failed: {}", resp.status()));
        }

        Ok(resp.json().await?)
    }
}

impl Default for GeometryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// ISO3 id of a GeoJSON feature, wherever the source put it.
pub fn feature_iso3(feature: &Value) -> Option<&str> {
    feature["id"]
        .as_str()
        .or_else(|| feature["properties"]["iso_a3"].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_iso3_from_id() {
        let feature = json!({ "id": "IND", "properties": { "name": "India" } });
        assert_eq!(feature_iso3(&feature), Some("IND"));
    }

    #[test]
    fn test_feature_iso3_from_properties() {
        let feature = json!({ "properties": { "name": "India", "iso_a3": "IND" } });
        assert_eq!(feature_iso3(&feature), Some("IND"));
    }

    #[test]
    fn test_feature_iso3_missing() {
        let feature = json!({ "properties": { "name": "Nowhere" } });
        assert_eq!(feature_iso3(&feature), None);
    }
}
