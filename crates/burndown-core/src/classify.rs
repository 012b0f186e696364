//! Story classification
//!
//! Decides which stories count toward burndown and turns them into
//! calendar-placed contribution events.

use crate::error::MalformedStory;
use crate::types::{round2, StoryDetail, StoryId, READY_STATUS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A story's effect on the series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionEvent {
    /// Originating story
    pub story_id: StoryId,
    /// Day the story opened
    pub date_created: NaiveDate,
    /// Day the story closed, if it has
    pub date_closed: Option<NaiveDate>,
    /// Points, rounded to two decimals
    pub points: f64,
    /// Business value, rounded to two decimals
    pub business_value: f64,
}

impl ContributionEvent {
    /// Check if the story is still open
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.date_closed.is_none()
    }
}

/// Classifies story records against a ready-status name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    ready_status: String,
}

impl Classifier {
    /// Create a classifier for the given ready-status name
    #[must_use]
    pub fn new(ready_status: impl Into<String>) -> Self {
        Self {
            ready_status: ready_status.into(),
        }
    }

    /// Classify one story
    ///
    /// Returns `Ok(None)` for stories that do not count: wrong status, no
    /// estimate, or an estimate of zero or less. These checks come first, so
    /// ignored stories are never reported as malformed.
    ///
    /// # Errors
    /// [`MalformedStory::MissingCreationDate`] when a counting story cannot be
    /// placed on the calendar.
    pub fn classify(&self, story: &StoryDetail) -> Result<Option<ContributionEvent>, MalformedStory> {
        if story.status_name != self.ready_status {
            return Ok(None);
        }
        let points = match story.points {
            Some(p) if p > 0.0 => p,
            _ => return Ok(None),
        };
        let date_created = story
            .date_created
            .ok_or(MalformedStory::MissingCreationDate(story.id))?;

        Ok(Some(ContributionEvent {
            story_id: story.id,
            date_created,
            date_closed: story.date_closed,
            points: round2(points),
            business_value: round2(story.business_value.unwrap_or(0.0)),
        }))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(READY_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn ready(points: f64) -> StoryDetail {
        StoryDetail::new(1, "Ready")
            .with_points(points)
            .created_on(date(1))
            .closed_on(date(3))
    }

    #[test]
    fn ready_story_with_points_contributes() {
        let event = Classifier::default()
            .classify(&ready(1.23456).with_business_value(2.005))
            .unwrap()
            .unwrap();

        assert_eq!(event.points, 1.23);
        assert_eq!(event.date_created, date(1));
        assert_eq!(event.date_closed, Some(date(3)));
        assert!(!event.is_open());
    }

    #[test]
    fn other_status_is_ignored() {
        let story = StoryDetail::new(1, "In progress").with_points(5.0);
        assert_eq!(Classifier::default().classify(&story), Ok(None));
    }

    #[test]
    fn zero_or_missing_points_are_ignored() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&ready(0.0)), Ok(None));
        assert_eq!(classifier.classify(&ready(-2.0)), Ok(None));
        assert_eq!(
            classifier.classify(&StoryDetail::new(1, "Ready").created_on(date(1))),
            Ok(None)
        );
    }

    #[test]
    fn missing_business_value_counts_as_zero() {
        let event = Classifier::default().classify(&ready(1.0)).unwrap().unwrap();
        assert_eq!(event.business_value, 0.0);
    }

    #[test]
    fn open_story_has_no_closure() {
        let story = StoryDetail::new(1, "Ready").with_points(2.0).created_on(date(2));
        let event = Classifier::default().classify(&story).unwrap().unwrap();
        assert!(event.is_open());
    }

    #[test]
    fn missing_creation_date_is_malformed() {
        let story = StoryDetail::new(9, "Ready").with_points(2.0);
        assert_eq!(
            Classifier::default().classify(&story),
            Err(MalformedStory::MissingCreationDate(StoryId(9)))
        );
    }

    #[test]
    fn custom_ready_status() {
        let classifier = Classifier::new("Done");
        let story = StoryDetail::new(1, "Done").with_points(1.0).created_on(date(1));
        assert!(classifier.classify(&story).unwrap().is_some());
    }
}
