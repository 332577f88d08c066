//! Trend-line sampling for plotting

use serde::Serialize;

use crate::config::OutputConfig;
use crate::models::RollingWindowResult;

/// One plotted point of a trend line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub sequence_index: usize,
    pub rolling_realized: Option<f64>,
    pub rolling_expected: Option<f64>,
    #[serde(rename = "diff_rolling_OBA")]
    pub diff_rolling_oba: Option<f64>,
}

impl From<&RollingWindowResult> for TrendPoint {
    fn from(result: &RollingWindowResult) -> Self {
        Self {
            sequence_index: result.sequence_index,
            rolling_realized: result.rolling_realized,
            rolling_expected: result.rolling_expected,
            diff_rolling_oba: result.diff_rolling_oba,
        }
    }
}

/// Sampling options
#[derive(Debug, Clone, Copy)]
pub struct TrendOptions {
    pub points: usize,
    pub only_full_windows: bool,
}

impl From<&OutputConfig> for TrendOptions {
    fn from(config: &OutputConfig) -> Self {
        Self { points: config.trend_points, only_full_windows: config.only_full_windows_in_trend }
    }
}

/// `points` evenly spaced indices over `0..len`, first and last included,
/// truncated toward zero. All indices when `len <= points`.
pub fn sample_indices(len: usize, points: usize) -> Vec<usize> {
    if len == 0 || points == 0 {
        return Vec::new();
    }
    if len <= points {
        return (0..len).collect();
    }
    if points == 1 {
        return vec![0];
    }
    (0..points).map(|k| k * (len - 1) / (points - 1)).collect()
}

/// Reduce a rolling series to a plottable trend line
pub fn sample_trend(series: &[RollingWindowResult], options: TrendOptions) -> Vec<TrendPoint> {
    let eligible: Vec<&RollingWindowResult> = series
        .iter()
        .filter(|r| !options.only_full_windows || r.is_full())
        .collect();

    sample_indices(eligible.len(), options.points)
        .into_iter()
        .map(|i| TrendPoint::from(eligible[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::rolling_series;
    use chrono::NaiveDate;
    use event_normalizer::PlateAppearanceEvent;

    #[test]
    fn test_sample_indices_even_spacing() {
        assert_eq!(sample_indices(10, 4), vec![0, 3, 6, 9]);
        assert_eq!(sample_indices(101, 5), vec![0, 25, 50, 75, 100]);
        assert_eq!(sample_indices(3, 20), vec![0, 1, 2]);
        assert_eq!(sample_indices(7, 1), vec![0]);
        assert!(sample_indices(0, 20).is_empty());
        assert!(sample_indices(5, 0).is_empty());
    }

    #[test]
    fn test_sample_trend_only_full_windows() {
        let events: Vec<PlateAppearanceEvent> = (0..6)
            .map(|i| PlateAppearanceEvent {
                sequence_index: i,
                game_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                at_bat_number: i as u32,
                realized_value: Some(0.1 * i as f64),
                expected_value: Some(0.3),
            })
            .collect();
        let series = rolling_series(&events, 3);

        let all = sample_trend(&series, TrendOptions { points: 20, only_full_windows: false });
        assert_eq!(all.len(), 6);

        let full = sample_trend(&series, TrendOptions { points: 20, only_full_windows: true });
        assert_eq!(full.len(), 4);
        assert_eq!(full[0].sequence_index, 2);

        let sampled = sample_trend(&series, TrendOptions { points: 2, only_full_windows: true });
        assert_eq!(
            sampled.iter().map(|p| p.sequence_index).collect::<Vec<_>>(),
            vec![2, 5]
        );
    }
}
