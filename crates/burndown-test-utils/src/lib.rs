//! Testing utilities for the burndown workspace
//!
//! Shared fixtures and an in-memory tracker with scripted failures and
//! latencies.

#![allow(missing_docs)]

use burndown_core::{
    AuthToken, FetchError, Milestone, MilestoneFetcher, MilestoneId, StoryDetail,
    StoryDetailFetcher, StoryId,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Day of January 2024
pub fn jan(d: u32) -> NaiveDate {
    date(2024, 1, d)
}

pub fn ready_story(id: u64, points: f64, created: NaiveDate, closed: Option<NaiveDate>) -> StoryDetail {
    let story = StoryDetail::new(id, "Ready").with_points(points).created_on(created);
    match closed {
        Some(closed) => story.closed_on(closed),
        None => story,
    }
}

pub fn sprint(total_points: Option<f64>, stories: &[u64]) -> Milestone {
    Milestone::new(1, jan(1), jan(5))
        .with_name("Sprint1")
        .with_total_points(total_points)
        .with_stories(stories.iter().copied())
}

#[derive(Debug, Clone)]
enum Script {
    Found(StoryDetail),
    Fail(FetchError),
}

/// In-memory tracker implementing both collaborator traits
#[derive(Debug, Default)]
pub struct ScriptedTracker {
    milestones: HashMap<MilestoneId, Milestone>,
    stories: HashMap<StoryId, Script>,
    delays: HashMap<StoryId, Duration>,
    story_calls: AtomicUsize,
}

impl ScriptedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.insert(milestone.id, milestone);
        self
    }

    pub fn with_story(mut self, story: StoryDetail) -> Self {
        self.stories.insert(story.id, Script::Found(story));
        self
    }

    pub fn with_stories(self, stories: impl IntoIterator<Item = StoryDetail>) -> Self {
        stories.into_iter().fold(self, Self::with_story)
    }

    pub fn with_failure(mut self, id: u64, error: FetchError) -> Self {
        self.stories.insert(StoryId(id), Script::Fail(error));
        self
    }

    pub fn with_delay(mut self, id: u64, delay: Duration) -> Self {
        self.delays.insert(StoryId(id), delay);
        self
    }

    pub fn story_calls(&self) -> usize {
        self.story_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MilestoneFetcher for ScriptedTracker {
    async fn fetch_milestone(
        &self,
        id: MilestoneId,
        _token: &AuthToken,
    ) -> Result<Milestone, FetchError> {
        self.milestones
            .get(&id)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

#[async_trait::async_trait]
impl StoryDetailFetcher for ScriptedTracker {
    async fn fetch_story(&self, id: StoryId, _token: &AuthToken) -> Result<StoryDetail, FetchError> {
        self.story_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        match self.stories.get(&id) {
            Some(Script::Found(story)) => Ok(story.clone()),
            Some(Script::Fail(error)) => Err(error.clone()),
            None => Err(FetchError::Status(404)),
        }
    }
}
