use std::collections::{BTreeMap, HashSet};

use crate::models::{AlignedDataset, Series};

/// How `common_periods` is ordered once the intersection is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderPolicy {
    /// Follow the first input series' own order. The result depends on which
    /// series comes first.
    #[default]
    FirstSeries,
    /// Sort periods ascending regardless of input order.
    AscendingPeriod,
}

/// Join per-entity series on the years present in every one of them.
///
/// Zero inputs and zero overlap both produce an empty dataset; neither is an
/// error, and the caller decides whether that renders as "no data". Each
/// entity's values keep that series' own order after membership filtering;
/// inputs are expected period-ascending (the normalizer guarantees it), which
/// keeps every value sequence 1:1 with `common_periods`.
pub fn align(series_list: &[Series], policy: OrderPolicy) -> AlignedDataset {
    let Some(first) = series_list.first() else {
        return AlignedDataset::default();
    };

    let mut common: HashSet<i32> = first.periods().collect();
    for series in &series_list[1..] {
        let periods: HashSet<i32> = series.periods().collect();
        common.retain(|p| periods.contains(p));
    }

    let mut common_periods: Vec<i32> = first.periods().filter(|p| common.contains(p)).collect();
    if policy == OrderPolicy::AscendingPeriod {
        common_periods.sort_unstable();
    }

    let mut aligned_series = BTreeMap::new();
    for series in series_list {
        let values: Vec<f64> = series
            .observations
            .iter()
            .filter(|obs| common.contains(&obs.period))
            .map(|obs| obs.value)
            .collect();
        aligned_series.insert(series.entity_id.clone(), values);
    }

    AlignedDataset {
        common_periods,
        series: aligned_series,
    }
}
