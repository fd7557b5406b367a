use async_trait::async_trait;

use crate::error::PipelineResult;
use crate::models::{Metric, RawObservation, YearRange};

pub mod exchange_rate;
pub mod geo;
pub mod news;
pub mod worldbank;

/// A provider of yearly indicator observations, one country at a time.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_observations(
        &self,
        country: &str,
        metric: Metric,
        range: Option<YearRange>,
    ) -> PipelineResult<Vec<RawObservation>>;
}
