//! Collaborator contracts
//!
//! The engine never talks to the network itself; it depends on these traits.
//! `taiga-client` provides the HTTP implementation.

use crate::error::FetchError;
use crate::types::{AuthToken, Milestone, MilestoneId, StoryDetail, StoryId};

/// Looks up a milestone record
#[async_trait::async_trait]
pub trait MilestoneFetcher: Send + Sync {
    /// Fetch one milestone
    ///
    /// # Errors
    /// Any failure is fatal to the burndown computation that requested it.
    async fn fetch_milestone(
        &self,
        id: MilestoneId,
        token: &AuthToken,
    ) -> Result<Milestone, FetchError>;
}

/// Looks up a single story record
#[async_trait::async_trait]
pub trait StoryDetailFetcher: Send + Sync {
    /// Fetch one story
    ///
    /// # Errors
    /// A non-success status must be reported as [`FetchError::Status`].
    async fn fetch_story(&self, id: StoryId, token: &AuthToken) -> Result<StoryDetail, FetchError>;
}

#[async_trait::async_trait]
impl<T: MilestoneFetcher + ?Sized> MilestoneFetcher for std::sync::Arc<T> {
    async fn fetch_milestone(
        &self,
        id: MilestoneId,
        token: &AuthToken,
    ) -> Result<Milestone, FetchError> {
        (**self).fetch_milestone(id, token).await
    }
}

#[async_trait::async_trait]
impl<T: StoryDetailFetcher + ?Sized> StoryDetailFetcher for std::sync::Arc<T> {
    async fn fetch_story(&self, id: StoryId, token: &AuthToken) -> Result<StoryDetail, FetchError> {
        (**self).fetch_story(id, token).await
    }
}
