//! Error types for burndown computation
//!
//! Per-story failures are local: they are recorded as [`SkippedStory`]
//! entries and never abort a computation. Only [`BurndownError`] is surfaced
//! to the caller.

use crate::types::{MilestoneId, StoryId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Failure of a single collaborator lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Tracker answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),

    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("undecodable response: {0}")]
    Decode(String),

    /// Fetch stage deadline expired before this lookup finished
    #[error("fetch deadline of {deadline_secs}s exceeded")]
    DeadlineExceeded { deadline_secs: u64 },
}

impl FetchError {
    /// Check if the lookup may succeed when repeated
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::Transport(_) | Self::DeadlineExceeded { .. } => true,
            Self::Decode(_) => false,
        }
    }

    /// HTTP status, when the tracker answered
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// A contributing story whose record cannot be placed on the calendar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedStory {
    /// No creation date on a Ready story with points
    #[error("story {0} has no creation date")]
    MissingCreationDate(StoryId),
}

/// Why a story was left out of the series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Lookup failed
    FetchFailed(String),
    /// Record could not be classified
    Malformed(String),
}

/// Report entry for a story excluded from aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedStory {
    /// Story ID
    pub story_id: StoryId,
    /// Reason it was skipped
    pub reason: SkipReason,
}

impl SkippedStory {
    /// Story whose fetch failed
    #[must_use]
    pub fn fetch_failed(story_id: StoryId, error: &FetchError) -> Self {
        Self {
            story_id,
            reason: SkipReason::FetchFailed(error.to_string()),
        }
    }

    /// Story whose record was malformed
    #[must_use]
    pub fn malformed(error: &MalformedStory) -> Self {
        let story_id = match error {
            MalformedStory::MissingCreationDate(id) => *id,
        };
        Self {
            story_id,
            reason: SkipReason::Malformed(error.to_string()),
        }
    }
}

/// Fatal burndown errors
#[derive(Debug, thiserror::Error)]
pub enum BurndownError {
    /// Milestone lookup failed
    #[error("milestone {id} unavailable: {source}")]
    Milestone {
        /// Milestone that was requested
        id: MilestoneId,
        /// Underlying lookup failure
        #[source]
        source: FetchError,
    },

    /// Milestone finishes before it starts
    #[error("milestone finishes ({finish}) before it starts ({start})")]
    InvalidDateRange {
        /// Estimated start
        start: NaiveDate,
        /// Estimated finish
        finish: NaiveDate,
    },
}

impl BurndownError {
    /// Check if error came from the tracker rather than the data
    #[inline]
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Milestone { .. })
    }
}
