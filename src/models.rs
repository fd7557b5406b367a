use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, PipelineResult};

/// Indicator kind requested by the chart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Gdp,
    Inflation,
}

impl Metric {
    /// World Bank indicator code for this metric.
    pub fn indicator_code(&self) -> &'static str {
        match self {
            Metric::Gdp => "NY.GDP.MKTP.CD",
            Metric::Inflation => "FP.CPI.TOTL.ZG",
        }
    }

    /// GDP is charted in trillions of current USD; inflation is already an
    /// annual percentage and passes through unchanged.
    pub fn normalize(&self, raw: f64) -> f64 {
        match self {
            Metric::Gdp => raw / 1e12,
            Metric::Inflation => raw,
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            Metric::Gdp => "Trillions USD",
            Metric::Inflation => "Percent",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Gdp => write!(f, "GDP"),
            Metric::Inflation => write!(f, "Inflation"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gdp" => Ok(Metric::Gdp),
            "inflation" | "cpi" => Ok(Metric::Inflation),
            other => Err(format!(
                "unknown metric '{}', expected 'gdp' or 'inflation'",
                other
            )),
        }
    }
}

/// One provider record before normalization. `value` stays optional so the
/// normalizer is the single place absent observations get dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub period: i32,
    pub value: Option<f64>,
}

/// A usable observation: value present and already scaled for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: i32,
    pub value: f64,
}

/// Inclusive year window for range-limited requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

/// One country's normalized time series for a single metric, period-ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub entity_id: String,
    pub metric: Metric,
    pub observations: Vec<Observation>,
}

impl Series {
    /// Normalize raw provider output: drop absent values, scale per metric,
    /// sort period-ascending and deduplicate. Zero usable observations is
    /// `NoData`, which aborts the whole multi-entity cycle.
    pub fn from_raw(
        entity_id: &str,
        metric: Metric,
        raw: Vec<RawObservation>,
    ) -> PipelineResult<Self> {
        let mut observations: Vec<Observation> = raw
            .into_iter()
            .filter_map(|obs| {
                obs.value.map(|v| Observation {
                    period: obs.period,
                    value: metric.normalize(v),
                })
            })
            .collect();

        // Providers usually answer newest-first; the chart wants ascending.
        observations.sort_by_key(|obs| obs.period);
        observations.dedup_by_key(|obs| obs.period);

        if observations.is_empty() {
            return Err(PipelineError::NoData {
                entity: entity_id.to_string(),
                metric,
            });
        }

        Ok(Self {
            entity_id: entity_id.to_string(),
            metric,
            observations,
        })
    }

    pub fn periods(&self) -> impl Iterator<Item = i32> + '_ {
        self.observations.iter().map(|obs| obs.period)
    }
}

/// The user's current choice of countries and metric. Immutable; every new
/// selection starts a fresh fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub entities: Vec<String>,
    pub metric: Metric,
}

impl Selection {
    pub fn new<I, S>(entities: I, metric: Metric) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entities: entities
                .into_iter()
                .map(|code| code.as_ref().to_ascii_uppercase())
                .collect(),
            metric,
        }
    }
}

/// Series joined on the years present in every one of them. Each value
/// sequence has the same length as `common_periods`; absent values were
/// dropped before alignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignedDataset {
    pub common_periods: Vec<i32>,
    pub series: BTreeMap<String, Vec<f64>>,
}

impl AlignedDataset {
    pub fn is_empty(&self) -> bool {
        self.common_periods.is_empty()
    }
}

/// Fitted OLS values for one entity, parallel to the common periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub entity_id: String,
    pub values: Vec<f64>,
}

/// What one successful fetch cycle publishes for the chart view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataset {
    pub metric: Metric,
    pub aligned: AlignedDataset,
    pub trends: Vec<TrendLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(period: i32, value: Option<f64>) -> RawObservation {
        RawObservation { period, value }
    }

    #[test]
    fn test_normalizer_drops_absent_values() {
        let series = Series::from_raw(
            "IN",
            Metric::Inflation,
            vec![raw(2020, Some(6.2)), raw(2019, None), raw(2018, Some(4.9))],
        )
        .unwrap();

        assert_eq!(series.observations.len(), 2);
        assert!(series.observations.iter().all(|obs| obs.value.is_finite()));
    }

    #[test]
    fn test_gdp_scaled_to_trillions() {
        let series = Series::from_raw(
            "IN",
            Metric::Gdp,
            vec![raw(2020, Some(2_660_000_000_000.0))],
        )
        .unwrap();

        assert!((series.observations[0].value - 2.66).abs() < 1e-12);
    }

    #[test]
    fn test_inflation_passes_through() {
        let series =
            Series::from_raw("TR", Metric::Inflation, vec![raw(2022, Some(72.3))]).unwrap();
        assert_eq!(series.observations[0].value, 72.3);
    }

    #[test]
    fn test_newest_first_input_becomes_ascending() {
        let series = Series::from_raw(
            "US",
            Metric::Inflation,
            vec![
                raw(2022, Some(8.0)),
                raw(2021, Some(4.7)),
                raw(2020, Some(1.2)),
            ],
        )
        .unwrap();

        let periods: Vec<i32> = series.periods().collect();
        assert_eq!(periods, vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_duplicate_periods_removed() {
        let series = Series::from_raw(
            "US",
            Metric::Inflation,
            vec![raw(2020, Some(1.2)), raw(2020, Some(1.3))],
        )
        .unwrap();

        assert_eq!(series.observations.len(), 1);
    }

    #[test]
    fn test_all_absent_is_no_data() {
        let err = Series::from_raw("ZZ", Metric::Gdp, vec![raw(2020, None), raw(2021, None)])
            .unwrap_err();
        assert_eq!(err.to_string(), "No GDP data found for ZZ");
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("GDP".parse::<Metric>().unwrap(), Metric::Gdp);
        assert_eq!("inflation".parse::<Metric>().unwrap(), Metric::Inflation);
        assert!("gdpx".parse::<Metric>().is_err());
    }

    #[test]
    fn test_selection_uppercases_codes() {
        let selection = Selection::new(["in", "us"], Metric::Gdp);
        assert_eq!(selection.entities, vec!["IN", "US"]);
    }
}
