use crate::error::{PipelineError, PipelineResult};
use crate::models::TrendLine;

/// Ordinary least-squares line over `y` against `x`, evaluated at each `x[i]`.
///
/// Degenerate inputs get explicit treatment instead of a silent NaN/Inf: an
/// empty input and a constant `x` are `DegenerateFit`; a single point fits a
/// flat line equal to its own value.
pub fn linear_trend(y: &[f64], x: &[f64]) -> PipelineResult<Vec<f64>> {
    debug_assert_eq!(y.len(), x.len());

    let n = y.len();
    if n == 0 {
        return Err(PipelineError::DegenerateFit { points: 0 });
    }
    if n == 1 {
        return Ok(vec![y[0]]);
    }

    let nf = n as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(xi, yi)| xi * yi).sum();
    let sum_xx: f64 = x.iter().map(|xi| xi * xi).sum();

    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return Err(PipelineError::DegenerateFit { points: n });
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;

    Ok(x.iter().map(|xi| slope * xi + intercept).collect())
}

/// Fit a trendline for one entity over its aligned chart values.
pub fn fit(entity_id: &str, periods: &[i32], values: &[f64]) -> PipelineResult<TrendLine> {
    let x: Vec<f64> = periods.iter().map(|p| *p as f64).collect();
    let fitted = linear_trend(values, &x)?;

    Ok(TrendLine {
        entity_id: entity_id.to_string(),
        values: fitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_line_round_trips() {
        // y = 0.4x - 780, no noise: the fit must reproduce the input.
        let x: Vec<f64> = (2015..=2020).map(|year| year as f64).collect();
        let y: Vec<f64> = x.iter().map(|xi| 0.4 * xi - 780.0).collect();

        let fitted = linear_trend(&y, &x).unwrap();
        for (fitted_val, actual) in fitted.iter().zip(&y) {
            assert!((fitted_val - actual).abs() < 1e-6);
        }
    }

    #[test]
    fn test_known_slope_and_intercept() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![2.0, 4.0, 6.0];

        let fitted = linear_trend(&y, &x).unwrap();
        assert!((fitted[0] - 2.0).abs() < 1e-9);
        assert!((fitted[2] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_input_stays_finite() {
        let x = vec![2018.0, 2019.0, 2020.0, 2021.0];
        let y = vec![1.2, 0.9, 1.8, 1.1];

        let fitted = linear_trend(&y, &x).unwrap();
        assert_eq!(fitted.len(), 4);
        assert!(fitted.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_single_point_fits_flat_line() {
        let fitted = linear_trend(&[3.14], &[2020.0]).unwrap();
        assert_eq!(fitted, vec![3.14]);
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        let err = linear_trend(&[], &[]).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateFit { points: 0 }));
    }

    #[test]
    fn test_constant_x_is_degenerate() {
        let err = linear_trend(&[1.0, 2.0], &[2020.0, 2020.0]).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateFit { points: 2 }));
    }

    #[test]
    fn test_fit_builds_trendline_for_entity() {
        let trend = fit("IN", &[2019, 2020, 2021], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(trend.entity_id, "IN");
        assert_eq!(trend.values.len(), 3);
        assert!((trend.values[1] - 2.0).abs() < 1e-9);
    }
}
