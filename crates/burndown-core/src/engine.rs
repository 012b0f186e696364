//! Burndown engine
//!
//! Runs the pipeline for one milestone:
//! 1. Fetch the milestone (fatal on failure)
//! 2. Fetch every story concurrently
//! 3. Classify and fold the outcomes sequentially, in story-ID order
//! 4. Gap-fill the three series
//! 5. Assemble the payload

use crate::chart::{BurndownChart, ChartAssembler};
use crate::classify::Classifier;
use crate::error::{BurndownError, SkippedStory};
use crate::fetch_stage::{FetchOutcome, FetchStage};
use crate::fetcher::{MilestoneFetcher, StoryDetailFetcher};
use crate::gap_fill::{expected_decrement, GapFiller};
use crate::series::SeriesAggregator;
use crate::types::{AuthToken, BurndownConfig, Milestone, MilestoneId};

/// Computes burndown charts from tracker collaborators
#[derive(Debug)]
pub struct BurndownEngine<M, S> {
    milestones: M,
    stories: S,
    config: BurndownConfig,
    classifier: Classifier,
}

impl<M, S> BurndownEngine<M, S>
where
    M: MilestoneFetcher,
    S: StoryDetailFetcher,
{
    /// Create an engine over the given collaborators
    #[must_use]
    pub fn new(milestones: M, stories: S, config: BurndownConfig) -> Self {
        let classifier = Classifier::new(config.ready_status.clone());
        Self {
            milestones,
            stories,
            config,
            classifier,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BurndownConfig {
        &self.config
    }

    /// Compute the chart for a milestone by ID
    ///
    /// # Errors
    /// - `BurndownError::Milestone` if the milestone lookup fails
    /// - `BurndownError::InvalidDateRange` if it finishes before it starts
    #[tracing::instrument(skip(self, token), fields(milestone_id = %id))]
    pub async fn compute(
        &self,
        id: MilestoneId,
        token: &AuthToken,
    ) -> Result<BurndownChart, BurndownError> {
        let milestone = self
            .milestones
            .fetch_milestone(id, token)
            .await
            .map_err(|source| {
                tracing::error!(error = %source, "milestone lookup failed");
                BurndownError::Milestone { id, source }
            })?;
        self.compute_for(&milestone, token).await
    }

    /// Compute the chart for an already fetched milestone
    ///
    /// # Errors
    /// `BurndownError::InvalidDateRange` if the milestone finishes before it
    /// starts.
    pub async fn compute_for(
        &self,
        milestone: &Milestone,
        token: &AuthToken,
    ) -> Result<BurndownChart, BurndownError> {
        validate_range(milestone)?;
        tracing::info!(
            stories = milestone.story_ids.len(),
            start = %milestone.estimated_start,
            finish = %milestone.estimated_finish,
            "computing burndown"
        );

        let outcomes = FetchStage::new(&self.stories, &self.config)
            .run(&milestone.story_ids, token)
            .await;
        let chart = aggregate(milestone, outcomes, &self.classifier);

        tracing::info!(
            days = chart.partial().len(),
            skipped = chart.skipped_stories.len(),
            "burndown computed"
        );
        Ok(chart)
    }
}

/// Fold fetched outcomes into a chart
///
/// Pure and deterministic: outcomes are ordered by story ID before folding,
/// so the arrival order of the concurrent fetches never changes the result.
#[must_use]
pub fn aggregate(
    milestone: &Milestone,
    mut outcomes: Vec<FetchOutcome>,
    classifier: &Classifier,
) -> BurndownChart {
    outcomes.sort_by_key(|o| o.story_id);

    let mut aggregator = SeriesAggregator::new(milestone);
    let mut skipped = Vec::new();

    for outcome in &outcomes {
        let story = match &outcome.result {
            Ok(story) => story,
            Err(e) => {
                tracing::warn!(story_id = %outcome.story_id, error = %e, "skipping story, fetch failed");
                skipped.push(SkippedStory::fetch_failed(outcome.story_id, e));
                continue;
            }
        };
        match classifier.classify(story) {
            Ok(Some(event)) => aggregator.fold(&event),
            Ok(None) => {
                tracing::debug!(story_id = %story.id, status = %story.status_name, "story does not count");
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed story");
                skipped.push(SkippedStory::malformed(&e));
            }
        }
    }

    let series = aggregator.finish();
    let filler = GapFiller::new(milestone.estimated_start, milestone.estimated_finish);
    let duration = filler.duration_days();
    let points_decrement = expected_decrement(milestone.total_points, duration);
    let bv_decrement = expected_decrement(series.total_business_value, duration);

    let mut partial = series.partial;
    let mut total = series.total;
    let mut business_value = series.business_value;
    filler.fill(&mut partial, points_decrement);
    filler.fill(&mut total, points_decrement);
    filler.fill(&mut business_value, bv_decrement);

    ChartAssembler::assemble(partial, business_value, total, skipped)
}

fn validate_range(milestone: &Milestone) -> Result<(), BurndownError> {
    if milestone.estimated_finish < milestone.estimated_start {
        return Err(BurndownError::InvalidDateRange {
            start: milestone.estimated_start,
            finish: milestone.estimated_finish,
        });
    }
    Ok(())
}
