//! HTTP client for the Taiga API
//!
//! Thin proxy over four endpoints:
//! - `GET /milestones/{id}`
//! - `GET /userstories/{id}`
//! - `GET /userstories?project={id}`
//! - `GET /userstory-custom-attributes?project={id}`

use crate::config::TaigaConfig;
use crate::error::ClientError;
use crate::wire::{CustomAttribute, MilestoneWire, StoryWire};
use burndown_core::{
    AuthToken, FetchError, Milestone, MilestoneFetcher, MilestoneId, StoryDetail,
    StoryDetailFetcher, StoryId,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::sync::Arc;

const DISABLE_PAGINATION: &str = "x-disable-pagination";

/// Tracker API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct TaigaClient {
    http: reqwest::Client,
    config: Arc<TaigaConfig>,
}

impl TaigaClient {
    /// Create a client
    ///
    /// # Errors
    /// `ClientError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: TaigaConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TaigaConfig {
        &self.config
    }

    /// Milestone with its planned stories
    ///
    /// # Errors
    /// Transport, status and decode failures.
    #[tracing::instrument(skip(self, token), fields(milestone_id = %id))]
    pub async fn milestone(
        &self,
        id: MilestoneId,
        token: &AuthToken,
    ) -> Result<Milestone, ClientError> {
        let wire: MilestoneWire = self
            .get_json(&format!("milestones/{id}"), &[], token, true)
            .await?;
        Milestone::try_from(wire)
    }

    /// Single story record
    ///
    /// # Errors
    /// Transport, status and decode failures.
    pub async fn story_detail(
        &self,
        id: StoryId,
        token: &AuthToken,
    ) -> Result<StoryDetail, ClientError> {
        let wire: StoryWire = self
            .get_json(&format!("userstories/{id}"), &[], token, false)
            .await?;
        Ok(StoryDetail::from(wire))
    }

    /// Every story of a project, as raw tracker JSON
    ///
    /// # Errors
    /// Transport, status and decode failures.
    #[tracing::instrument(skip(self, token))]
    pub async fn project_stories(
        &self,
        project_id: u64,
        token: &AuthToken,
    ) -> Result<Vec<serde_json::Value>, ClientError> {
        self.get_json(
            "userstories",
            &[("project", project_id.to_string())],
            token,
            true,
        )
        .await
    }

    /// Custom attribute definitions for a project's stories
    ///
    /// # Errors
    /// Transport, status and decode failures.
    #[tracing::instrument(skip(self, token))]
    pub async fn custom_attributes(
        &self,
        project_id: u64,
        token: &AuthToken,
    ) -> Result<Vec<CustomAttribute>, ClientError> {
        self.get_json(
            "userstory-custom-attributes",
            &[("project", project_id.to_string())],
            token,
            true,
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &AuthToken,
        whole_collection: bool,
    ) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        let mut request = self
            .http
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, token.bearer())
            .header(CONTENT_TYPE, "application/json");
        if whole_collection && self.config.disable_pagination {
            request = request.header(DISABLE_PAGINATION, "True");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "tracker request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(format!("{url}: {e}")))
    }
}

#[async_trait::async_trait]
impl MilestoneFetcher for TaigaClient {
    async fn fetch_milestone(
        &self,
        id: MilestoneId,
        token: &AuthToken,
    ) -> Result<Milestone, FetchError> {
        self.milestone(id, token).await.map_err(FetchError::from)
    }
}

#[async_trait::async_trait]
impl StoryDetailFetcher for TaigaClient {
    async fn fetch_story(&self, id: StoryId, token: &AuthToken) -> Result<StoryDetail, FetchError> {
        self.story_detail(id, token).await.map_err(FetchError::from)
    }
}
