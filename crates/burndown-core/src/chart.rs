//! Chart payload assembly

use crate::error::SkippedStory;
use crate::series::SeriesMap;
use crate::types::DayEntry;
use serde::{Deserialize, Serialize};

/// Partial points burndown group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialBurndown {
    /// Ascending-date entries
    pub partial_burndown_data: Vec<DayEntry>,
}

/// Business-value burndown group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BvBurndown {
    /// Ascending-date entries, in business-value units
    pub bv_burndown_data: Vec<DayEntry>,
}

/// Total points burndown group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalBurndown {
    /// Ascending-date entries
    pub total_burndown_data: Vec<DayEntry>,
}

/// Result payload handed to dashboards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BurndownChart {
    /// Partial points series
    pub partial_burndown: PartialBurndown,
    /// Business-value series
    pub bv_burndown: BvBurndown,
    /// Total points series
    pub total_burndown: TotalBurndown,
    /// Stories left out, with the reason
    #[serde(default)]
    pub skipped_stories: Vec<SkippedStory>,
}

impl BurndownChart {
    /// Partial points entries
    #[inline]
    #[must_use]
    pub fn partial(&self) -> &[DayEntry] {
        &self.partial_burndown.partial_burndown_data
    }

    /// Business-value entries
    #[inline]
    #[must_use]
    pub fn business_value(&self) -> &[DayEntry] {
        &self.bv_burndown.bv_burndown_data
    }

    /// Total points entries
    #[inline]
    #[must_use]
    pub fn total(&self) -> &[DayEntry] {
        &self.total_burndown.total_burndown_data
    }
}

/// Packages dense series maps into a [`BurndownChart`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartAssembler;

impl ChartAssembler {
    /// Build the payload
    #[must_use]
    pub fn assemble(
        partial: SeriesMap,
        business_value: SeriesMap,
        total: SeriesMap,
        skipped_stories: Vec<SkippedStory>,
    ) -> BurndownChart {
        BurndownChart {
            partial_burndown: PartialBurndown {
                partial_burndown_data: sorted(partial),
            },
            bv_burndown: BvBurndown {
                bv_burndown_data: sorted(business_value),
            },
            total_burndown: TotalBurndown {
                total_burndown_data: sorted(total),
            },
            skipped_stories,
        }
    }
}

fn sorted(map: SeriesMap) -> Vec<DayEntry> {
    let mut entries = map.into_entries();
    entries.sort_by_key(|e| e.date);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn payload_shape_matches_dashboard_contract() {
        let mut map = SeriesMap::seeded(date(2), 3.0);
        map.open(date(1), 1.0);
        let chart = ChartAssembler::assemble(
            map.clone(),
            SeriesMap::seeded(date(2), 0.0),
            map,
            Vec::new(),
        );

        let json = serde_json::to_value(&chart).unwrap();
        let partial = &json["partial_burndown"]["partial_burndown_data"];
        assert_eq!(partial[0]["date"], "2024-01-01");
        assert_eq!(partial[1]["date"], "2024-01-02");
        assert_eq!(partial[1]["expected_remaining"], 3.0);
        assert!(json["bv_burndown"]["bv_burndown_data"].is_array());
        assert!(json["total_burndown"]["total_burndown_data"].is_array());
        assert_eq!(json["skipped_stories"], serde_json::json!([]));
    }

    #[test]
    fn accessors_expose_groups() {
        let chart = ChartAssembler::assemble(
            SeriesMap::seeded(date(1), 1.0),
            SeriesMap::seeded(date(1), 2.0),
            SeriesMap::seeded(date(1), 3.0),
            Vec::new(),
        );
        assert_eq!(chart.partial()[0].remaining, 1.0);
        assert_eq!(chart.business_value()[0].remaining, 2.0);
        assert_eq!(chart.total()[0].remaining, 3.0);
    }

    #[test]
    fn default_chart_is_empty() {
        let chart = BurndownChart::default();
        assert!(chart.partial().is_empty());
        assert!(chart.skipped_stories.is_empty());
    }
}
