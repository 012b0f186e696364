//! Burndown Core - sprint burndown aggregation engine
//!
//! Computes, for one milestone, three per-day series:
//! - Partial points burndown
//! - Total points burndown
//! - Business-value burndown
//!
//! Story lookups run concurrently with a bounded number in flight; the fold
//! over their results is strictly sequential and ordered by story ID, so the
//! same snapshot always yields the same chart.
//!
//! # Example
//!
//! ```rust,ignore
//! use burndown_core::{AuthToken, BurndownConfig, BurndownEngine, MilestoneId};
//!
//! # async fn example(client: taiga_client::TaigaClient) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = BurndownEngine::new(client.clone(), client, BurndownConfig::new());
//! let chart = engine.compute(MilestoneId(42), &AuthToken::new("token")).await?;
//!
//! println!("{} days", chart.partial().len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod chart;
pub mod classify;
pub mod engine;
pub mod error;
pub mod fetch_stage;
pub mod fetcher;
pub mod gap_fill;
pub mod series;
pub mod types;

// Re-exports for convenience
pub use chart::{BurndownChart, BvBurndown, ChartAssembler, PartialBurndown, TotalBurndown};
pub use classify::{Classifier, ContributionEvent};
pub use engine::{aggregate, BurndownEngine};
pub use error::{BurndownError, FetchError, MalformedStory, SkipReason, SkippedStory};
pub use fetch_stage::{FetchOutcome, FetchStage};
pub use fetcher::{MilestoneFetcher, StoryDetailFetcher};
pub use gap_fill::{expected_decrement, GapFiller};
pub use series::{AggregatedSeries, SeriesAggregator, SeriesMap};
pub use types::{
    round2, AuthToken, BurndownConfig, DayEntry, Milestone, MilestoneId, StoryDetail, StoryId,
    READY_STATUS,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for computing burndown charts
    pub use crate::{
        AuthToken, BurndownChart, BurndownConfig, BurndownEngine, BurndownError, DayEntry,
        FetchError, Milestone, MilestoneFetcher, MilestoneId, StoryDetail, StoryDetailFetcher,
        StoryId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
