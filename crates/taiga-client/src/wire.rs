//! Tracker wire models
//!
//! The tracker is loose about shapes: story lists come as objects or bare
//! IDs, status as an object or an ID with a side-car, dates as plain dates or
//! timestamps. These models accept every variant and convert into the core
//! records.

use crate::error::ClientError;
use burndown_core::{Milestone, MilestoneId, StoryDetail, StoryId};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Parse a tracker date, keeping only the calendar day
///
/// Accepts RFC 3339 timestamps, naive timestamps and plain `YYYY-MM-DD`
/// dates. Timestamps keep the day as written, without timezone conversion.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoryRef {
    Object { id: u64 },
    Bare(u64),
}

impl StoryRef {
    fn id(&self) -> StoryId {
        match self {
            Self::Object { id } | Self::Bare(id) => StoryId(*id),
        }
    }
}

/// Milestone as returned by `GET /milestones/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneWire {
    id: u64,
    #[serde(default)]
    name: String,
    estimated_start: String,
    estimated_finish: String,
    #[serde(default)]
    total_points: Option<f64>,
    #[serde(default)]
    user_stories: Vec<StoryRef>,
}

impl TryFrom<MilestoneWire> for Milestone {
    type Error = ClientError;

    fn try_from(wire: MilestoneWire) -> Result<Self, Self::Error> {
        let date = |field: &str, raw: &str| {
            parse_date(raw).ok_or_else(|| {
                ClientError::Decode(format!("milestone {}: invalid {field} {raw:?}", wire.id))
            })
        };
        let start = date("estimated_start", &wire.estimated_start)?;
        let finish = date("estimated_finish", &wire.estimated_finish)?;

        Ok(Milestone::new(MilestoneId(wire.id), start, finish)
            .with_name(wire.name)
            .with_total_points(wire.total_points)
            .with_stories(wire.user_stories.iter().map(StoryRef::id)))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NamedStatus {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StatusField {
    Named(NamedStatus),
    Id(u64),
}

/// Story as returned by `GET /userstories/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct StoryWire {
    id: u64,
    #[serde(default)]
    status: Option<StatusField>,
    #[serde(default)]
    status_extra_info: Option<NamedStatus>,
    #[serde(default)]
    points: Option<serde_json::Value>,
    #[serde(default)]
    total_points: Option<f64>,
    #[serde(default)]
    business_value: Option<f64>,
    #[serde(default, alias = "created_date")]
    date_created: Option<String>,
    #[serde(default, alias = "finish_date")]
    date_closed: Option<String>,
}

impl From<StoryWire> for StoryDetail {
    fn from(wire: StoryWire) -> Self {
        let status_name = match (&wire.status, &wire.status_extra_info) {
            (Some(StatusField::Named(status)), _) | (_, Some(status)) => status.name.clone(),
            _ => String::new(),
        };
        // Role-keyed point maps carry no number; fall back to the story total.
        let points = wire
            .points
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .or(wire.total_points);

        let date_created = wire.date_created.as_deref().and_then(parse_date);
        let date_closed = wire.date_closed.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                tracing::warn!(story_id = wire.id, raw, "unreadable closure date, treating story as open");
            }
            parsed
        });

        StoryDetail {
            id: StoryId(wire.id),
            status_name,
            points,
            business_value: wire.business_value,
            date_created,
            date_closed,
        }
    }
}

/// User story custom attribute definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// Attribute ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Sort order
    #[serde(default)]
    pub order: i64,
    /// Owning project
    #[serde(default)]
    pub project: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_date_shapes() {
        assert_eq!(parse_date("2024-02-07"), Some(date(2024, 2, 7)));
        assert_eq!(parse_date("2024-02-07T18:46:54.396Z"), Some(date(2024, 2, 7)));
        assert_eq!(parse_date("2024-02-07T23:12:30+05:00"), Some(date(2024, 2, 7)));
        assert_eq!(parse_date("2024-02-07T23:12:30.051"), Some(date(2024, 2, 7)));
        assert_eq!(parse_date("2024-02-07 08:00:00"), Some(date(2024, 2, 7)));
        assert_eq!(parse_date("next tuesday"), None);
    }

    #[test]
    fn milestone_with_object_stories_and_null_points() {
        let wire: MilestoneWire = serde_json::from_value(json!({
            "id": 7,
            "name": "Sprint1",
            "estimated_start": "2024-01-01",
            "estimated_finish": "2024-01-05",
            "total_points": null,
            "user_stories": [{"id": 11, "subject": "a"}, {"id": 12}]
        }))
        .unwrap();
        let milestone = Milestone::try_from(wire).unwrap();

        assert_eq!(milestone.total_points, 0.0);
        assert_eq!(milestone.story_ids, vec![StoryId(11), StoryId(12)]);
        assert_eq!(milestone.name, "Sprint1");
    }

    #[test]
    fn milestone_with_bare_story_ids() {
        let wire: MilestoneWire = serde_json::from_value(json!({
            "id": 7,
            "estimated_start": "2024-01-01",
            "estimated_finish": "2024-01-05",
            "total_points": 12.5,
            "user_stories": [3, 4]
        }))
        .unwrap();
        let milestone = Milestone::try_from(wire).unwrap();
        assert_eq!(milestone.story_ids, vec![StoryId(3), StoryId(4)]);
        assert_eq!(milestone.total_points, 12.5);
    }

    #[test]
    fn milestone_bad_date_is_decode_error() {
        let wire: MilestoneWire = serde_json::from_value(json!({
            "id": 7,
            "estimated_start": "soon",
            "estimated_finish": "2024-01-05"
        }))
        .unwrap();
        assert!(matches!(Milestone::try_from(wire), Err(ClientError::Decode(_))));
    }

    #[test]
    fn story_with_status_object() {
        let wire: StoryWire = serde_json::from_value(json!({
            "id": 11,
            "status": {"name": "Ready"},
            "points": 3.0,
            "business_value": 5,
            "date_created": "2024-01-02T09:00:00Z",
            "date_closed": "2024-01-04T17:30:00Z"
        }))
        .unwrap();
        let story = StoryDetail::from(wire);

        assert_eq!(story.status_name, "Ready");
        assert_eq!(story.points, Some(3.0));
        assert_eq!(story.business_value, Some(5.0));
        assert_eq!(story.date_created, Some(date(2024, 1, 2)));
        assert_eq!(story.date_closed, Some(date(2024, 1, 4)));
    }

    #[test]
    fn story_with_status_id_and_side_car() {
        let wire: StoryWire = serde_json::from_value(json!({
            "id": 12,
            "status": 4,
            "status_extra_info": {"name": "Ready", "color": "#fff"},
            "points": {"1": 2, "2": 5},
            "total_points": 6.5,
            "created_date": "2024-01-02T09:00:00Z",
            "finish_date": null
        }))
        .unwrap();
        let story = StoryDetail::from(wire);

        assert_eq!(story.status_name, "Ready");
        assert_eq!(story.points, Some(6.5));
        assert_eq!(story.business_value, None);
        assert_eq!(story.date_closed, None);
    }

    #[test]
    fn story_with_unreadable_creation_date() {
        let wire: StoryWire = serde_json::from_value(json!({
            "id": 13,
            "status": {"name": "Ready"},
            "points": 1,
            "date_created": "garbage"
        }))
        .unwrap();
        assert_eq!(StoryDetail::from(wire).date_created, None);
    }
}
