use burndown_core::{aggregate, BurndownChart, Classifier, FetchOutcome, Milestone, StoryDetail};
use burndown_test_utils::jan;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct StorySpec {
    ready: bool,
    points: i64,
    business_value: i64,
    created: i64,
    closed_after: Option<i64>,
}

fn story_spec() -> impl Strategy<Value = StorySpec> {
    (
        any::<bool>(),
        0i64..=20,
        0i64..=10,
        -3i64..25,
        proptest::option::of(0i64..10),
    )
        .prop_map(|(ready, points, business_value, created, closed_after)| StorySpec {
            ready,
            points,
            business_value,
            created,
            closed_after,
        })
}

fn build(start: NaiveDate, specs: &[StorySpec]) -> Vec<FetchOutcome> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let created = start + Duration::days(spec.created);
            let mut story = StoryDetail::new(idx as u64 + 1, if spec.ready { "Ready" } else { "New" })
                .with_points(spec.points as f64)
                .with_business_value(spec.business_value as f64)
                .created_on(created);
            if let Some(after) = spec.closed_after {
                story = story.closed_on(created + Duration::days(after));
            }
            FetchOutcome {
                story_id: story.id,
                result: Ok(story),
            }
        })
        .collect()
}

fn in_range(date: NaiveDate, milestone: &Milestone) -> bool {
    date >= milestone.estimated_start && date <= milestone.estimated_finish
}

fn counting(specs: &[StorySpec]) -> impl Iterator<Item = &StorySpec> {
    specs.iter().filter(|s| s.ready && s.points > 0)
}

fn run(duration: i64, total: i64, specs: &[StorySpec]) -> (Milestone, BurndownChart) {
    let start = jan(1);
    let milestone = Milestone::new(1, start, start + Duration::days(duration))
        .with_total_points(Some(total as f64));
    let chart = aggregate(&milestone, build(start, specs), &Classifier::default());
    (milestone, chart)
}

proptest! {
    #[test]
    fn prop_every_day_present_and_baseline_non_negative(
        duration in 0i64..20,
        total in 0i64..100,
        specs in proptest::collection::vec(story_spec(), 0..12)
    ) {
        let (milestone, chart) = run(duration, total, &specs);

        for series in [chart.partial(), chart.total(), chart.business_value()] {
            for day in milestone.estimated_start.iter_days().take(duration as usize + 1) {
                prop_assert!(series.iter().any(|e| e.date == day), "missing {}", day);
            }
            prop_assert!(series.iter().all(|e| e.expected_remaining >= 0.0));
            prop_assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        }
    }

    #[test]
    fn prop_baseline_non_increasing_in_range(
        duration in 1i64..20,
        total in 0i64..100,
        specs in proptest::collection::vec(story_spec(), 0..12)
    ) {
        let (milestone, chart) = run(duration, total, &specs);

        for series in [chart.partial(), chart.total(), chart.business_value()] {
            let baseline: Vec<f64> = series
                .iter()
                .filter(|e| in_range(e.date, &milestone))
                .map(|e| e.expected_remaining)
                .collect();
            prop_assert!(baseline.windows(2).all(|w| w[1] <= w[0]), "{:?}", baseline);
        }
    }

    #[test]
    fn prop_completed_and_remaining_conserve_points(
        duration in 1i64..20,
        total in 0i64..100,
        specs in proptest::collection::vec(story_spec(), 0..12)
    ) {
        let (milestone, chart) = run(duration, total, &specs);
        let start = milestone.estimated_start;

        let mut opened = 0i64;
        let mut closed = 0i64;
        for spec in counting(&specs) {
            let created = start + Duration::days(spec.created);
            if in_range(created, &milestone) {
                opened += spec.points;
            }
            if let Some(after) = spec.closed_after {
                if in_range(created + Duration::days(after), &milestone) {
                    closed += spec.points;
                }
            }
        }

        let completed: f64 = chart
            .partial()
            .iter()
            .filter(|e| in_range(e.date, &milestone))
            .map(|e| e.completed)
            .sum();
        prop_assert_eq!(completed, (opened - closed) as f64);

        let last = chart.partial().iter().find(|e| e.date == milestone.estimated_finish).unwrap();
        prop_assert_eq!(last.remaining, (total - opened + closed) as f64);
        prop_assert_eq!(chart.partial(), chart.total());
    }

    #[test]
    fn prop_fold_order_independent(
        duration in 0i64..20,
        total in 0i64..100,
        specs in proptest::collection::vec(story_spec(), 0..12)
    ) {
        let start = jan(1);
        let milestone = Milestone::new(1, start, start + Duration::days(duration))
            .with_total_points(Some(total as f64));
        let forward = build(start, &specs);
        let mut reversed = forward.clone();
        reversed.reverse();

        prop_assert_eq!(
            aggregate(&milestone, forward, &Classifier::default()),
            aggregate(&milestone, reversed, &Classifier::default())
        );
    }
}

#[test]
fn closed_within_range_nets_to_zero() {
    let specs = vec![StorySpec {
        ready: true,
        points: 10,
        business_value: 0,
        created: 0,
        closed_after: Some(2),
    }];
    let (_, chart) = run(4, 10, &specs);

    let completed: f64 = chart.partial().iter().map(|e| e.completed).sum();
    assert_eq!(completed, 0.0);
    assert_eq!(chart.partial().last().unwrap().remaining, 10.0);
}
