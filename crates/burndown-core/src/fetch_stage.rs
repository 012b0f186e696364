//! Concurrent story fetch stage
//!
//! Fans out one lookup per story ID with a bounded number in flight, then
//! fans back in once every ID has an outcome. Nothing here mutates shared
//! state; the fold happens afterwards, sequentially.

use crate::error::FetchError;
use crate::fetcher::StoryDetailFetcher;
use crate::types::{AuthToken, BurndownConfig, StoryDetail, StoryId};
use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Result of looking up one story
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Story that was requested
    pub story_id: StoryId,
    /// Record or failure
    pub result: Result<StoryDetail, FetchError>,
}

impl FetchOutcome {
    /// Check if the lookup succeeded
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Bounded fan-out/fan-in over a [`StoryDetailFetcher`]
#[derive(Debug)]
pub struct FetchStage<'a, F: ?Sized> {
    fetcher: &'a F,
    max_in_flight: usize,
    deadline: Duration,
}

impl<'a, F> FetchStage<'a, F>
where
    F: StoryDetailFetcher + ?Sized,
{
    /// Create a stage bounded by `config`
    #[must_use]
    pub fn new(fetcher: &'a F, config: &BurndownConfig) -> Self {
        Self {
            fetcher,
            max_in_flight: config.max_concurrent_fetches.max(1),
            deadline: config.fetch_deadline(),
        }
    }

    /// Fetch every story, returning one outcome per input ID
    ///
    /// Outcomes are sorted by story ID (stable for duplicates) so that the
    /// downstream fold sees the same order on every run. Lookups still
    /// pending when the deadline expires are dropped and reported as
    /// [`FetchError::DeadlineExceeded`].
    pub async fn run(&self, ids: &[StoryId], token: &AuthToken) -> Vec<FetchOutcome> {
        let fetcher = self.fetcher;
        let mut slots: Vec<Option<Result<StoryDetail, FetchError>>> = vec![None; ids.len()];

        let mut pending = stream::iter(ids.iter().copied().enumerate())
            .map(move |(idx, id)| async move {
                let result = fetcher.fetch_story(id, token).await;
                (idx, result)
            })
            .buffer_unordered(self.max_in_flight);

        // Far-future deadlines overflow the clock; those run unbounded.
        let deadline = tokio::time::Instant::now().checked_add(self.deadline);
        loop {
            let next = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, pending.next()).await,
                None => Ok(pending.next().await),
            };
            match next {
                Ok(Some((idx, result))) => {
                    if let Err(e) = &result {
                        tracing::debug!(story_id = %ids[idx], error = %e, "story fetch failed");
                    }
                    slots[idx] = Some(result);
                }
                Ok(None) => break,
                Err(_) => {
                    let unfinished = slots.iter().filter(|s| s.is_none()).count();
                    tracing::warn!(
                        unfinished,
                        deadline_secs = self.deadline.as_secs(),
                        "fetch deadline exceeded, abandoning remaining lookups"
                    );
                    break;
                }
            }
        }
        drop(pending);

        let deadline_secs = self.deadline.as_secs();
        let mut outcomes: Vec<FetchOutcome> = ids
            .iter()
            .zip(slots)
            .map(|(&story_id, slot)| FetchOutcome {
                story_id,
                result: slot.unwrap_or(Err(FetchError::DeadlineExceeded { deadline_secs })),
            })
            .collect();
        outcomes.sort_by_key(|o| o.story_id);
        outcomes
    }
}
