//! Date-keyed series and the sequential fold
//!
//! A [`SeriesMap`] starts with a single seed entry for the milestone start and
//! grows an entry for every day a contribution event touches. The
//! [`SeriesAggregator`] owns the three maps exclusively while folding; events
//! must be applied one at a time, in a fixed order.

use crate::classify::ContributionEvent;
use crate::types::{DayEntry, Milestone};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Sparse or dense per-day series, ordered by date
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMap {
    start: NaiveDate,
    days: BTreeMap<NaiveDate, DayEntry>,
}

impl SeriesMap {
    /// Create a map holding only the seed entry
    #[must_use]
    pub fn seeded(start: NaiveDate, total: f64) -> Self {
        let mut days = BTreeMap::new();
        days.insert(start, DayEntry::seed(start, total));
        Self { start, days }
    }

    /// Seed date
    #[inline]
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Entry for `date`
    #[inline]
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.days.get(&date)
    }

    /// Number of days with an entry
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Check if the map has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Entries in ascending date order
    pub fn entries(&self) -> impl Iterator<Item = &DayEntry> {
        self.days.values()
    }

    /// Consume into ascending-date entries
    #[must_use]
    pub fn into_entries(self) -> Vec<DayEntry> {
        self.days.into_values().collect()
    }

    /// Record work opening on `date`
    pub fn open(&mut self, date: NaiveDate, amount: f64) {
        let entry = self.ensure_day(date);
        entry.completed += amount;
        entry.remaining -= amount;
        entry.expected_remaining -= amount;
    }

    /// Record work closing on `date`, reversing an earlier [`open`](Self::open)
    pub fn close(&mut self, date: NaiveDate, amount: f64) {
        let entry = self.ensure_day(date);
        entry.completed -= amount;
        entry.remaining += amount;
        entry.expected_remaining += amount;
    }

    /// Shift every entry's remaining and baseline by `total`
    pub fn rebase(&mut self, total: f64) {
        for entry in self.days.values_mut() {
            entry.remaining += total;
            entry.expected_remaining += total;
        }
    }

    pub(crate) fn floor_expected(&mut self) {
        for entry in self.days.values_mut() {
            entry.expected_remaining = entry.expected_remaining.max(0.0);
        }
    }

    pub(crate) fn get_mut(&mut self, date: NaiveDate) -> Option<&mut DayEntry> {
        self.days.get_mut(&date)
    }

    pub(crate) fn insert(&mut self, entry: DayEntry) {
        self.days.insert(entry.date, entry);
    }

    /// Entry for `date`, created on demand
    ///
    /// A new entry carries `remaining` and `expected_remaining` from the
    /// nearest earlier entry, or from the seed when `date` precedes it.
    fn ensure_day(&mut self, date: NaiveDate) -> &mut DayEntry {
        let (remaining, expected_remaining) = self
            .days
            .range(..date)
            .next_back()
            .map(|(_, e)| e)
            .or_else(|| self.days.get(&self.start))
            .map_or((0.0, 0.0), |e| (e.remaining, e.expected_remaining));
        self.days
            .entry(date)
            .or_insert_with(|| DayEntry::new(date, 0.0, remaining, expected_remaining))
    }
}

/// Output of the fold: three sparse maps and the business-value total
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    /// Points series, partial view
    pub partial: SeriesMap,
    /// Points series, cumulative view
    pub total: SeriesMap,
    /// Business-value series, rebased on `total_business_value`
    pub business_value: SeriesMap,
    /// Sum of business value over all folded events
    pub total_business_value: f64,
    /// Number of events folded
    pub events_folded: usize,
}

/// Sequential reducer over contribution events
///
/// The partial and total maps are seeded independently and folded
/// identically, so a filter can later be applied to one without the other.
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    partial: SeriesMap,
    total: SeriesMap,
    business_value: SeriesMap,
    total_business_value: f64,
    events_folded: usize,
}

impl SeriesAggregator {
    /// Seed all three maps for `milestone`
    #[must_use]
    pub fn new(milestone: &Milestone) -> Self {
        let start = milestone.estimated_start;
        Self {
            partial: SeriesMap::seeded(start, milestone.total_points),
            total: SeriesMap::seeded(start, milestone.total_points),
            business_value: SeriesMap::seeded(start, 0.0),
            total_business_value: 0.0,
            events_folded: 0,
        }
    }

    /// Fold one event into every map
    pub fn fold(&mut self, event: &ContributionEvent) {
        for map in [&mut self.partial, &mut self.total] {
            apply(map, event, event.points);
        }
        apply(&mut self.business_value, event, event.business_value);
        self.total_business_value += event.business_value;
        self.events_folded += 1;
    }

    /// Fold every event, in iteration order
    pub fn fold_all<'e>(&mut self, events: impl IntoIterator<Item = &'e ContributionEvent>) {
        for event in events {
            self.fold(event);
        }
    }

    /// Running business-value total
    #[inline]
    #[must_use]
    pub fn total_business_value(&self) -> f64 {
        self.total_business_value
    }

    /// Finish folding
    ///
    /// The business-value map was seeded at zero because its total is only
    /// known now; it is rebased onto that total here.
    #[must_use]
    pub fn finish(mut self) -> AggregatedSeries {
        self.business_value.rebase(self.total_business_value);
        AggregatedSeries {
            partial: self.partial,
            total: self.total,
            business_value: self.business_value,
            total_business_value: self.total_business_value,
            events_folded: self.events_folded,
        }
    }
}

fn apply(map: &mut SeriesMap, event: &ContributionEvent, amount: f64) {
    map.open(event.date_created, amount);
    if let Some(closed) = event.date_closed {
        map.close(closed, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StoryId;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn event(created: u32, closed: Option<u32>, points: f64, bv: f64) -> ContributionEvent {
        ContributionEvent {
            story_id: StoryId(1),
            date_created: date(created),
            date_closed: closed.map(date),
            points,
            business_value: bv,
        }
    }

    fn milestone(total: f64) -> Milestone {
        Milestone::new(1, date(1), date(5)).with_total_points(Some(total))
    }

    #[test]
    fn seed_entry_exists_before_folding() {
        let agg = SeriesAggregator::new(&milestone(10.0)).finish();
        assert_eq!(agg.partial.len(), 1);
        assert_eq!(agg.partial.get(date(1)), Some(&DayEntry::seed(date(1), 10.0)));
        assert_eq!(agg.business_value.get(date(1)), Some(&DayEntry::seed(date(1), 0.0)));
    }

    #[test]
    fn open_and_close_adjust_entries() {
        let mut agg = SeriesAggregator::new(&milestone(10.0));
        agg.fold(&event(1, Some(3), 10.0, 4.0));
        let out = agg.finish();

        let created = out.partial.get(date(1)).unwrap();
        assert_eq!((created.completed, created.remaining), (10.0, 0.0));
        assert_eq!(created.expected_remaining, 0.0);

        let closed = out.partial.get(date(3)).unwrap();
        assert_eq!((closed.completed, closed.remaining), (-10.0, 10.0));
        assert_eq!(out.partial, out.total);
        assert_eq!(out.total_business_value, 4.0);
    }

    #[test]
    fn new_day_inherits_nearest_earlier_entry() {
        let mut map = SeriesMap::seeded(date(1), 10.0);
        map.open(date(2), 3.0);
        map.open(date(4), 1.0);

        let entry = map.get(date(4)).unwrap();
        assert_eq!(entry.completed, 1.0);
        assert_eq!(entry.remaining, 6.0);
        assert!(map.get(date(3)).is_none());
    }

    #[test]
    fn day_before_start_inherits_seed() {
        let mut map = SeriesMap::seeded(date(5), 8.0);
        map.open(date(2), 3.0);

        let entry = map.get(date(2)).unwrap();
        assert_eq!((entry.completed, entry.remaining), (3.0, 5.0));
        assert_eq!(map.start(), date(5));
    }

    #[test]
    fn open_story_only_applies_creation() {
        let mut agg = SeriesAggregator::new(&milestone(5.0));
        agg.fold(&event(2, None, 2.0, 1.0));
        let out = agg.finish();

        assert_eq!(out.partial.len(), 2);
        assert_eq!(out.partial.get(date(2)).unwrap().remaining, 3.0);
    }

    #[test]
    fn business_value_rebased_on_total() {
        let mut agg = SeriesAggregator::new(&milestone(5.0));
        agg.fold_all(&[event(1, Some(2), 1.0, 3.0), event(2, None, 1.0, 2.0)]);
        let out = agg.finish();

        let seed = out.business_value.get(date(1)).unwrap();
        assert_eq!(seed.completed, 3.0);
        assert_eq!(seed.remaining, 2.0);
        assert_eq!(out.total_business_value, 5.0);
        assert_eq!(out.events_folded, 2);
    }

    #[test]
    fn business_value_opened_on_start_day_matches_points_shape() {
        let mut agg = SeriesAggregator::new(&milestone(6.0));
        agg.fold_all(&[event(1, Some(3), 4.0, 4.0), event(2, None, 2.0, 2.0)]);
        let out = agg.finish();

        // Start day keeps its own opening: total minus what opened that day.
        let start = out.business_value.get(date(1)).unwrap();
        assert_eq!(
            (start.completed, start.remaining, start.expected_remaining),
            (4.0, 2.0, 2.0)
        );
        let points_start = out.partial.get(date(1)).unwrap();
        assert_eq!(points_start.remaining, start.remaining);

        let closed = out.business_value.get(date(3)).unwrap();
        assert_eq!((closed.completed, closed.remaining), (-4.0, 4.0));
    }
}
