use thiserror::Error;

use crate::models::Metric;

/// Error taxonomy for one fetch-and-recompute cycle. Errors are local to the
/// cycle that raised them; none are fatal to the process, and recovery is
/// simply running the same cycle again.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The provider returned zero usable observations for an entity/metric.
    #[error("No {metric} data found for {entity}")]
    NoData { entity: String, metric: Metric },

    /// Network or provider failure: timeout, non-success status, or a
    /// payload without the expected shape.
    #[error("Provider request failed: {0}")]
    Transport(String),

    /// The trend formula is undefined for this input (empty, or constant x).
    #[error("Trend fit is undefined for {points} data point(s)")]
    DegenerateFit { points: usize },

    /// A newer selection replaced this cycle while its fetches were still in
    /// flight; the result was discarded, not rendered.
    #[error("Fetch cycle superseded by a newer selection")]
    Superseded,
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Transport(err.to_string())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
