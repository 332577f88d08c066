//! # Sliding Window Accumulator
//!
//! Trailing-sum rolling means over a batter's ordered plate appearances.
//! Each side (realized and expected) keeps its own running sum and running
//! count, so a null on one side never distorts the other side's mean.
//! Every step adds the entering event and, once the window is full, subtracts
//! the event `window` positions back: O(1) per event per window size.

use event_normalizer::PlateAppearanceEvent;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::models::RollingWindowResult;

/// Validated, de-duplicated window sizes in ascending order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WindowSizes(Vec<usize>);

impl WindowSizes {
    /// Validate configured window sizes. An empty list or any zero or
    /// negative entry is rejected before any computation can start.
    pub fn new(sizes: &[i64]) -> Result<Self> {
        if sizes.is_empty() {
            return Err(EngineError::InvalidWindowConfiguration(
                "window size list is empty".to_string(),
            ));
        }

        let mut windows = Vec::with_capacity(sizes.len());
        for &size in sizes {
            if size <= 0 {
                return Err(EngineError::InvalidWindowConfiguration(format!(
                    "window sizes must be positive, got {size}"
                )));
            }
            let size = usize::try_from(size).map_err(|_| {
                EngineError::InvalidWindowConfiguration(format!("window size {size} is too large"))
            })?;
            windows.push(size);
        }

        windows.sort_unstable();
        windows.dedup();
        Ok(Self(windows))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, window: usize) -> bool {
        self.0.binary_search(&window).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// Running sum and count for one side of the window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SideSum {
    sum: f64,
    count: usize,
}

impl SideSum {
    pub(crate) fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn remove(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum -= value;
            self.count -= 1;
            // Drop accumulated rounding residue once the side is empty
            if self.count == 0 {
                self.sum = 0.0;
            }
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Incremental accumulator for one batter and one window size
#[derive(Debug, Clone)]
pub struct RollingAccumulator {
    window: usize,
    span: usize,
    realized: SideSum,
    expected: SideSum,
}

impl RollingAccumulator {
    pub fn new(window: usize) -> Self {
        debug_assert!(window > 0, "window sizes are validated by WindowSizes");
        Self { window, span: 0, realized: SideSum::default(), expected: SideSum::default() }
    }

    /// Slide the window one event forward. `leaving` is the event that falls
    /// out, present only once `window` events have already been seen.
    pub fn advance(
        &mut self,
        entering: &PlateAppearanceEvent,
        leaving: Option<&PlateAppearanceEvent>,
    ) -> RollingWindowResult {
        self.realized.add(entering.realized_value);
        self.expected.add(entering.expected_value);

        match leaving {
            Some(old) => {
                self.realized.remove(old.realized_value);
                self.expected.remove(old.expected_value);
            }
            None => self.span += 1,
        }

        let rolling_realized = self.realized.mean();
        let rolling_expected = self.expected.mean();

        RollingWindowResult {
            sequence_index: entering.sequence_index,
            game_date: entering.game_date,
            window: self.window,
            span: self.span,
            realized_count: self.realized.count(),
            expected_count: self.expected.count(),
            rolling_realized,
            rolling_expected,
            diff_rolling_oba: rolling_realized.zip(rolling_expected).map(|(r, e)| r - e),
        }
    }
}

/// Full rolling series for one ordered event sequence and one window size
pub fn rolling_series(events: &[PlateAppearanceEvent], window: usize) -> Vec<RollingWindowResult> {
    let mut accumulator = RollingAccumulator::new(window);
    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let leaving = i.checked_sub(window).map(|j| &events[j]);
            accumulator.advance(event, leaving)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn events(values: &[(Option<f64>, Option<f64>)]) -> Vec<PlateAppearanceEvent> {
        values
            .iter()
            .enumerate()
            .map(|(i, &(realized, expected))| PlateAppearanceEvent {
                sequence_index: i,
                game_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                at_bat_number: i as u32 + 1,
                realized_value: realized,
                expected_value: expected,
            })
            .collect()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be defined");
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }

    #[test]
    fn test_window_sizes_validation() {
        assert!(matches!(WindowSizes::new(&[]), Err(EngineError::InvalidWindowConfiguration(_))));
        assert!(matches!(
            WindowSizes::new(&[50, 0]),
            Err(EngineError::InvalidWindowConfiguration(_))
        ));
        assert!(matches!(
            WindowSizes::new(&[-5, 100]),
            Err(EngineError::InvalidWindowConfiguration(_))
        ));

        let windows = WindowSizes::new(&[250, 50, 100, 50]).unwrap();
        assert_eq!(windows.as_slice(), &[50, 100, 250]);
        assert!(windows.contains(100));
        assert!(!windows.contains(150));
    }

    #[test]
    fn test_first_point_is_the_event_itself() {
        let series = rolling_series(&events(&[(Some(0.9), Some(0.45))]), 50);
        assert_eq!(series.len(), 1);
        assert_close(series[0].rolling_realized, 0.9);
        assert_close(series[0].rolling_expected, 0.45);
        assert_close(series[0].diff_rolling_oba, 0.45);
        assert_eq!(series[0].span, 1);
        assert!(!series[0].is_full());
    }

    #[test]
    fn test_expanding_then_sliding() {
        let series = rolling_series(
            &events(&[
                (Some(1.0), Some(1.0)),
                (Some(0.0), Some(0.5)),
                (Some(0.5), Some(0.0)),
                (Some(2.0), Some(1.0)),
            ]),
            2,
        );

        assert_close(series[0].rolling_realized, 1.0);
        assert_close(series[1].rolling_realized, 0.5);
        assert_close(series[2].rolling_realized, 0.25);
        assert_close(series[3].rolling_realized, 1.25);
        assert_close(series[3].rolling_expected, 0.5);
        assert_close(series[3].diff_rolling_oba, 0.75);
        assert_eq!(series.iter().map(|r| r.span).collect::<Vec<_>>(), vec![1, 2, 2, 2]);
    }

    #[test]
    fn test_independent_counts_with_expected_nulls() {
        let series = rolling_series(
            &events(&[(Some(0.3), Some(0.25)), (Some(0.9), None), (Some(0.0), Some(0.10))]),
            3,
        );
        let last = &series[2];

        assert_close(last.rolling_realized, 0.4);
        assert_close(last.rolling_expected, 0.175);
        assert_eq!(last.realized_count, 3);
        assert_eq!(last.expected_count, 2);
        assert!(last.expected_count < last.realized_count);
        assert!(last.is_full());
    }

    #[test]
    fn test_side_without_values_is_undefined() {
        let series = rolling_series(&events(&[(None, Some(0.2)), (Some(0.7), Some(0.3))]), 1);

        assert_eq!(series[0].rolling_realized, None);
        assert_eq!(series[0].diff_rolling_oba, None);
        assert_close(series[1].rolling_realized, 0.7);
        assert_close(series[1].diff_rolling_oba, 0.4);
    }

    #[test]
    fn test_null_leaving_window_keeps_counts_consistent() {
        let series = rolling_series(
            &events(&[(Some(0.5), None), (Some(0.1), Some(0.2)), (None, Some(0.6))]),
            2,
        );

        assert_eq!(series[1].realized_count, 2);
        assert_eq!(series[1].expected_count, 1);
        assert_eq!(series[2].realized_count, 1);
        assert_eq!(series[2].expected_count, 2);
        assert_close(series[2].rolling_realized, 0.1);
        assert_close(series[2].rolling_expected, 0.4);
    }
}
