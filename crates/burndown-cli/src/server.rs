//! HTTP endpoint
//!
//! `POST /burndown` with body `{"milestoneId": <id>}` and an
//! `Authorization: Bearer <token>` header. Replies with the chart, or
//! `{"error": ...}` with:
//! - 401 when the bearer token is missing
//! - 502 when the milestone lookup fails upstream
//! - 422 when the milestone dates are inverted

use burndown_core::{
    AuthToken, BurndownEngine, BurndownError, MilestoneFetcher, MilestoneId, StoryDetailFetcher,
};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Filter;

/// Request body
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurndownRequest {
    /// Milestone to chart
    pub milestone_id: MilestoneId,
}

/// Routes served by [`serve`]
pub fn routes<M, S>(
    engine: Arc<BurndownEngine<M, S>>,
) -> impl Filter<Extract = (WithStatus<Json>,), Error = warp::Rejection> + Clone
where
    M: MilestoneFetcher + 'static,
    S: StoryDetailFetcher + 'static,
{
    let engine = warp::any().map(move || Arc::clone(&engine));

    warp::post()
        .and(warp::path("burndown"))
        .and(warp::path::end())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .and(engine)
        .and_then(handle_burndown)
}

/// Serve until the process is stopped
pub async fn serve<M, S>(engine: Arc<BurndownEngine<M, S>>, addr: SocketAddr)
where
    M: MilestoneFetcher + 'static,
    S: StoryDetailFetcher + 'static,
{
    tracing::info!(%addr, "burndown endpoint listening");
    warp::serve(routes(engine)).run(addr).await;
}

fn bearer(header: Option<&str>) -> Option<AuthToken> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(AuthToken::new)
}

fn error_reply(message: impl std::fmt::Display, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": message.to_string() })),
        status,
    )
}

fn status_for(error: &BurndownError) -> StatusCode {
    match error {
        BurndownError::Milestone { .. } => StatusCode::BAD_GATEWAY,
        BurndownError::InvalidDateRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn handle_burndown<M, S>(
    authorization: Option<String>,
    request: BurndownRequest,
    engine: Arc<BurndownEngine<M, S>>,
) -> Result<WithStatus<Json>, Infallible>
where
    M: MilestoneFetcher,
    S: StoryDetailFetcher,
{
    let Some(token) = bearer(authorization.as_deref()) else {
        return Ok(error_reply("missing bearer token", StatusCode::UNAUTHORIZED));
    };

    match engine.compute(request.milestone_id, &token).await {
        Ok(chart) => Ok(warp::reply::with_status(
            warp::reply::json(&chart),
            StatusCode::OK,
        )),
        Err(error) => {
            tracing::warn!(milestone_id = %request.milestone_id, %error, "burndown request failed");
            Ok(error_reply(&error, status_for(&error)))
        }
    }
}
