use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const NEWS_URL: &str = "https://newsdata.io/api/1/news";

/// The feed shows at most six cards.
const MAX_HEADLINES: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub published: Option<NaiveDateTime>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
struct NewsResponse {
    results: Option<Vec<RawArticle>>,
}

#[derive(Deserialize)]
struct RawArticle {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    image_url: Option<String>,
}

/// Business headlines by topic keyword. Opaque wrapper; article content is
/// displayed as-is.
pub struct NewsFetcher {
    api_key: String,
    client: Client,
}

impl NewsFetcher {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client }
    }

    pub async fn fetch_headlines(&self, topic: &str) -> Result<Vec<Article>> {
        debug!("Fetching headlines for topic '{}'", topic);

        let resp = self
            .client
            .get(NEWS_URL)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", topic),
                ("language", "en"),
                ("category", "business"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!("News API error: {}", resp.status()));
        }

        let json: Value = resp.json().await?;
        Self::parse_headlines(&json)
    }

    fn parse_headlines(json: &Value) -> Result<Vec<Article>> {
        let resp: NewsResponse = serde_json::from_value(json.clone())?;

        let articles = resp
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| {
                let title = raw.title?;
                Some(Article {
                    title,
                    link: raw.link,
                    description: raw.description,
                    // newsdata.io format: "2024-05-01 18:30:02"
                    published: raw
                        .pub_date
                        .as_deref()
                        .and_then(|d| NaiveDateTime::parse_from_str(d, "%Y-%m-%d %H:%M:%S").ok()),
                    image_url: raw.image_url,
                })
            })
            .take(MAX_HEADLINES)
            .collect();

        Ok(articles)
    }
}
