//! Core types for burndown computation
//!
//! Defines the records the engine consumes and produces:
//! - Identifiers and credentials
//! - Milestone and story detail records from the tracker
//! - Per-day series entries
//! - Engine configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status name a story must carry to count toward burndown
pub const READY_STATUS: &str = "Ready";

/// Default bound on in-flight story fetches
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 15;

/// Default overall deadline for the fetch stage, in seconds
pub const DEFAULT_FETCH_DEADLINE_SECS: u64 = 60;

/// Tracker identifier of a user story
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub u64);

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StoryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Tracker identifier of a milestone (sprint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneId(pub u64);

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MilestoneId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Bearer token forwarded to the tracker API
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// A sprint with a fixed date range and a set of planned stories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone ID
    pub id: MilestoneId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// First day of the sprint
    pub estimated_start: NaiveDate,
    /// Last day of the sprint
    pub estimated_finish: NaiveDate,
    /// Planned points; the tracker reports null as 0
    pub total_points: f64,
    /// Planned stories, in tracker order
    pub story_ids: Vec<StoryId>,
}

impl Milestone {
    /// Create a milestone with no stories
    #[must_use]
    pub fn new(
        id: impl Into<MilestoneId>,
        estimated_start: NaiveDate,
        estimated_finish: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            estimated_start,
            estimated_finish,
            total_points: 0.0,
            story_ids: Vec::new(),
        }
    }

    /// With planned points; `None` is treated as 0
    #[inline]
    #[must_use]
    pub fn with_total_points(mut self, total_points: Option<f64>) -> Self {
        self.total_points = total_points.unwrap_or(0.0);
        self
    }

    /// With planned stories
    #[inline]
    #[must_use]
    pub fn with_stories(mut self, ids: impl IntoIterator<Item = impl Into<StoryId>>) -> Self {
        self.story_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whole days between start and finish
    #[inline]
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.estimated_finish - self.estimated_start).num_days()
    }
}

/// Story record as reported by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDetail {
    /// Story ID
    pub id: StoryId,
    /// Workflow status name
    pub status_name: String,
    /// Point estimate
    pub points: Option<f64>,
    /// Business value score
    pub business_value: Option<f64>,
    /// Creation date; `None` when the record is missing or unreadable
    pub date_created: Option<NaiveDate>,
    /// Closure date; `None` while the story is open
    pub date_closed: Option<NaiveDate>,
}

impl StoryDetail {
    /// Create a story with the given status and no estimate
    #[must_use]
    pub fn new(id: impl Into<StoryId>, status_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status_name: status_name.into(),
            points: None,
            business_value: None,
            date_created: None,
            date_closed: None,
        }
    }

    /// With point estimate
    #[inline]
    #[must_use]
    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }

    /// With business value
    #[inline]
    #[must_use]
    pub fn with_business_value(mut self, value: f64) -> Self {
        self.business_value = Some(value);
        self
    }

    /// With creation date
    #[inline]
    #[must_use]
    pub fn created_on(mut self, date: NaiveDate) -> Self {
        self.date_created = Some(date);
        self
    }

    /// With closure date
    #[inline]
    #[must_use]
    pub fn closed_on(mut self, date: NaiveDate) -> Self {
        self.date_closed = Some(date);
        self
    }
}

/// One day of a burndown series
///
/// Points and business-value series share this shape; units differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    /// Calendar day
    pub date: NaiveDate,
    /// Net work opened/closed on this day
    pub completed: f64,
    /// Work remaining at the end of the day
    pub remaining: f64,
    /// Linear baseline, never below zero once gap-filled
    pub expected_remaining: f64,
}

impl DayEntry {
    /// Create an entry
    #[inline]
    #[must_use]
    pub fn new(date: NaiveDate, completed: f64, remaining: f64, expected_remaining: f64) -> Self {
        Self {
            date,
            completed,
            remaining,
            expected_remaining,
        }
    }

    /// Seed entry for the first day of a series
    #[inline]
    #[must_use]
    pub fn seed(date: NaiveDate, total: f64) -> Self {
        Self::new(date, 0.0, total, total)
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurndownConfig {
    /// Maximum in-flight story fetches
    pub max_concurrent_fetches: usize,
    /// Overall fetch-stage deadline in seconds
    pub fetch_deadline_secs: u64,
    /// Status name that makes a story count
    pub ready_status: String,
}

impl BurndownConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max concurrent fetches (at least 1)
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// With fetch deadline, rounded up to whole seconds (at least 1)
    #[inline]
    #[must_use]
    pub fn with_fetch_deadline(mut self, deadline: Duration) -> Self {
        let secs = deadline.as_secs() + u64::from(deadline.subsec_nanos() > 0);
        self.fetch_deadline_secs = secs.max(1);
        self
    }

    /// With ready status name
    #[inline]
    #[must_use]
    pub fn with_ready_status(mut self, status: impl Into<String>) -> Self {
        self.ready_status = status.into();
        self
    }

    /// Fetch deadline as a duration
    ///
    /// A configured zero is read as one second.
    #[inline]
    #[must_use]
    pub fn fetch_deadline(&self) -> Duration {
        Duration::from_secs(self.fetch_deadline_secs.max(1))
    }
}

impl Default for BurndownConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            fetch_deadline_secs: DEFAULT_FETCH_DEADLINE_SECS,
            ready_status: READY_STATUS.to_string(),
        }
    }
}

/// Round to two decimal places
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
