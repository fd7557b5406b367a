use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::analysis::trend;
use crate::catalog::Catalog;
use crate::core::aligner::{self, OrderPolicy};
use crate::core::rate_limiter::RateLimiter;
use crate::error::{PipelineError, PipelineResult};
use crate::fetcher::IndicatorSource;
use crate::models::{AlignedDataset, ChartDataset, Metric, Selection, Series, TrendLine};

/// Runs fetch-and-recompute cycles for the chart view and owns the currently
/// displayed dataset.
///
/// Every selection change starts a new cycle keyed by a monotonically
/// increasing token. A cycle whose token is no longer the latest when it
/// completes is discarded: it may neither publish its result nor clear the
/// state a newer cycle published.
pub struct Orchestrator {
    source: Arc<dyn IndicatorSource>,
    order_policy: OrderPolicy,
    latest_cycle: AtomicU64,
    current: RwLock<Option<ChartDataset>>,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn IndicatorSource>) -> Self {
        Self::with_order_policy(source, OrderPolicy::default())
    }

    pub fn with_order_policy(source: Arc<dyn IndicatorSource>, order_policy: OrderPolicy) -> Self {
        Self {
            source,
            order_policy,
            latest_cycle: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// The dataset published by the most recent completed cycle, if any.
    pub async fn current_dataset(&self) -> Option<ChartDataset> {
        self.current.read().await.clone()
    }

    /// Run one fetch-and-recompute cycle. On success the result replaces the
    /// current dataset atomically; on failure the current dataset is cleared
    /// so no stale chart outlives its selection.
    pub async fn run_cycle(&self, selection: &Selection) -> PipelineResult<ChartDataset> {
        let token = self.latest_cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.fetch_and_compute(selection).await;

        let mut current = self.current.write().await;
        if self.latest_cycle.load(Ordering::SeqCst) != token {
            // A newer selection took over while this cycle was fetching.
            return Err(PipelineError::Superseded);
        }

        match result {
            Ok(dataset) => {
                info!(
                    "Cycle {}: published {} series over {} common period(s)",
                    token,
                    dataset.aligned.series.len(),
                    dataset.aligned.common_periods.len()
                );
                *current = Some(dataset.clone());
                Ok(dataset)
            }
            Err(err) => {
                warn!("Cycle {} failed: {}", token, err);
                current.take();
                Err(err)
            }
        }
    }

    async fn fetch_and_compute(&self, selection: &Selection) -> PipelineResult<ChartDataset> {
        let metric = selection.metric;

        // Nothing selected is a valid, displayable empty state.
        if selection.entities.is_empty() {
            return Ok(ChartDataset {
                metric,
                aligned: AlignedDataset::default(),
                trends: Vec::new(),
            });
        }

        for code in &selection.entities {
            if Catalog::get(code).is_none() {
                warn!("Unrecognized country code '{}'", code);
                return Err(PipelineError::NoData {
                    entity: code.clone(),
                    metric,
                });
            }
        }

        // Fan out one fetch per entity. Alignment waits for all of them, and
        // any single failure fails the whole cycle.
        let fetches = selection
            .entities
            .iter()
            .map(|code| self.fetch_series(code, metric));
        let series_list = try_join_all(fetches).await?;

        let aligned = aligner::align(&series_list, self.order_policy);

        // No overlap renders as "no data"; the fitter is never invoked on an
        // empty x.
        let trends = if aligned.is_empty() {
            Vec::new()
        } else {
            series_list
                .iter()
                .map(|series| {
                    let values = &aligned.series[series.entity_id.as_str()];
                    trend::fit(&series.entity_id, &aligned.common_periods, values)
                })
                .collect::<PipelineResult<Vec<TrendLine>>>()?
        };

        Ok(ChartDataset {
            metric,
            aligned,
            trends,
        })
    }

    async fn fetch_series(&self, code: &str, metric: Metric) -> PipelineResult<Series> {
        RateLimiter::wait(self.source.name()).await;
        let raw = self.source.fetch_observations(code, metric, None).await?;
        Series::from_raw(code, metric, raw)
    }
}
