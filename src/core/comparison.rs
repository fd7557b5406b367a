use serde::Serialize;

use crate::catalog::Catalog;
use crate::core::rate_limiter::RateLimiter;
use crate::error::{PipelineError, PipelineResult};
use crate::fetcher::IndicatorSource;
use crate::models::{Metric, RawObservation, YearRange};

/// One year of the side-by-side view. Gaps stay `None`: unlike the chart
/// pipeline this table keeps every year of the window even when one
/// indicator is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub year: i32,
    pub gdp: Option<f64>,
    pub inflation: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityComparison {
    pub entity_id: String,
    pub rows: Vec<ComparisonRow>,
}

/// Fetch GDP and inflation per entity over a fixed year window.
///
/// Requests run sequentially (two per entity) with rate-limiter pacing. An
/// entity whose GDP or inflation comes back entirely empty fails the whole
/// build, matching the chart pipeline's all-or-nothing policy.
pub async fn build_comparison(
    source: &dyn IndicatorSource,
    entities: &[String],
    range: YearRange,
) -> PipelineResult<Vec<EntityComparison>> {
    let mut comparisons = Vec::with_capacity(entities.len());

    for code in entities {
        if Catalog::get(code).is_none() {
            return Err(PipelineError::NoData {
                entity: code.clone(),
                metric: Metric::Gdp,
            });
        }

        RateLimiter::wait(source.name()).await;
        let gdp = source
            .fetch_observations(code, Metric::Gdp, Some(range))
            .await?;

        RateLimiter::wait(source.name()).await;
        let inflation = source
            .fetch_observations(code, Metric::Inflation, Some(range))
            .await?;

        if gdp.is_empty() {
            return Err(PipelineError::NoData {
                entity: code.clone(),
                metric: Metric::Gdp,
            });
        }
        if inflation.is_empty() {
            return Err(PipelineError::NoData {
                entity: code.clone(),
                metric: Metric::Inflation,
            });
        }

        comparisons.push(EntityComparison {
            entity_id: code.clone(),
            rows: merge_rows(&gdp, &inflation, range),
        });
    }

    Ok(comparisons)
}

/// One row per year of the window, values normalized per metric, gaps kept.
fn merge_rows(
    gdp: &[RawObservation],
    inflation: &[RawObservation],
    range: YearRange,
) -> Vec<ComparisonRow> {
    (range.start..=range.end)
        .map(|year| ComparisonRow {
            year,
            gdp: value_for(gdp, year).map(|v| Metric::Gdp.normalize(v)),
            inflation: value_for(inflation, year).map(|v| Metric::Inflation.normalize(v)),
        })
        .collect()
}

fn value_for(observations: &[RawObservation], year: i32) -> Option<f64> {
    observations
        .iter()
        .find(|obs| obs.period == year)
        .and_then(|obs| obs.value)
}
