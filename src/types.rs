use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::overlap::Interval;

/// A scheduled (or not yet scheduled) activity on a trip itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    /// Itinerary day the activity was filed under. When absent, the local
    /// date of `start_time` decides the day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Manual ordering within the day (drag-and-drop order).
    #[serde(default)]
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Activity {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            day: None,
            start_time: None,
            end_time: None,
            position: 0,
            location: None,
            notes: None,
        }
    }

    pub fn with_times(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Project onto the overlap detector's interval shape.
    pub fn interval(&self) -> Interval {
        Interval::new(self.id.clone(), self.start_time, self.end_time)
    }
}

/// Activity as returned to callers, carrying its overlap flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    #[serde(flatten)]
    pub activity: Activity,
    pub overlap: bool,
}

/// All activities filed under one local date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub date: NaiveDate,
    pub activities: Vec<ActivityView>,
    pub overlap_count: usize,
}

/// Whole-trip view: every dated day plus the activities not yet placed on one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryReport {
    pub days: Vec<ItineraryDay>,
    pub unscheduled: Vec<Activity>,
}
