//! Gap filling and the expected-decay baseline
//!
//! Turns a sparse, event-keyed [`SeriesMap`] into one entry per calendar day
//! from the day after the seed through the milestone finish. Each day depends
//! on the one before it, so the walk is strictly sequential.

use crate::series::SeriesMap;
use crate::types::{round2, DayEntry};
use chrono::NaiveDate;

/// Per-day baseline decrement for spreading `total` over `duration_days`
///
/// A zero-length (or inverted) range drops the whole total in a single day.
#[inline]
#[must_use]
pub fn expected_decrement(total: f64, duration_days: i64) -> f64 {
    if duration_days <= 0 {
        return total;
    }
    #[allow(clippy::cast_precision_loss)]
    let days = duration_days as f64;
    round2(total / days)
}

/// Densifies a series over a milestone's date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapFiller {
    start: NaiveDate,
    finish: NaiveDate,
}

impl GapFiller {
    /// Create a filler for `[start, finish]`
    #[inline]
    #[must_use]
    pub fn new(start: NaiveDate, finish: NaiveDate) -> Self {
        Self { start, finish }
    }

    /// Whole days in the range
    #[inline]
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.finish - self.start).num_days()
    }

    /// Fill every day in `(start, finish]`
    ///
    /// Missing days carry the previous day's remaining with nothing completed.
    /// Existing days recompute remaining as the previous remaining minus what
    /// they completed. The baseline always steps down by `decrement` and is
    /// floored at zero, as is every entry outside the walked range.
    pub fn fill(&self, map: &mut SeriesMap, decrement: f64) {
        map.floor_expected();
        let mut prev_date = self.start;
        for date in self.start.iter_days().skip(1).take_while(|d| *d <= self.finish) {
            let Some(prev) = map.get(prev_date).copied() else {
                tracing::warn!(%prev_date, "series has no entry to carry from");
                return;
            };
            let expected_remaining = round2(prev.expected_remaining - decrement).max(0.0);

            match map.get_mut(date) {
                Some(entry) => {
                    entry.remaining = round2(prev.remaining - entry.completed);
                    entry.expected_remaining = expected_remaining;
                }
                None => map.insert(DayEntry::new(date, 0.0, prev.remaining, expected_remaining)),
            }
            prev_date = date;
        }
    }
}
