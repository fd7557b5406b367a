use anyhow::{Context, Result};

/// API credentials are the only configuration this crate reads. A local
/// `.env` file is honored when present.
pub fn exchange_rate_key() -> Result<String> {
    var("EXCHANGE_RATE_API_KEY")
}

pub fn news_api_key() -> Result<String> {
    var("NEWS_API_KEY")
}

fn var(name: &str) -> Result<String> {
    dotenvy::dotenv().ok();
    std::env::var(name).with_context(|| format!("{} is not set", name))
}
