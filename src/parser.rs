//! Activity row parsing.
//!
//! Turns raw JSON activity rows into typed [`Activity`] records, so that the
//! itinerary and overlap code only ever see well-formed instants.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PlannerError;
use crate::types::Activity;

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    day: Option<String>,
    #[serde(default, alias = "start_time")]
    start_time: Option<String>,
    #[serde(default, alias = "end_time")]
    end_time: Option<String>,
    #[serde(default)]
    position: Option<i64>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Parse activity rows from either a bare array or `{ "activities": [...] }`.
///
/// Rows are decoded one at a time so a bad field is reported against its row.
pub fn parse_activities(json: &str, tz: &Tz) -> Result<Vec<Activity>, PlannerError> {
    let rows = match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => rows,
        Value::Object(mut document) => match document.remove("activities") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(PlannerError::InvalidDocument(
                    "object has no \"activities\" array".to_string(),
                ))
            }
        },
        other => {
            return Err(PlannerError::InvalidDocument(format!(
                "expected an array or object, found {}",
                json_kind(&other)
            )))
        }
    };

    let activities = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| activity_from_value(index, row, tz))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Parsed {} activities", activities.len());
    Ok(activities)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn row_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn activity_from_value(index: usize, value: Value, tz: &Tz) -> Result<Activity, PlannerError> {
    let id = value.get("id").and_then(row_id);
    let row: RawActivity =
        serde_json::from_value(value).map_err(|e| PlannerError::InvalidRow {
            index,
            id: id.clone().unwrap_or_else(|| "no id".to_string()),
            message: e.to_string(),
        })?;
    activity_from_row(row, id, tz)
}

/// Read and parse an activities file.
pub fn load_activities(path: &Path, tz: &Tz) -> Result<Vec<Activity>, PlannerError> {
    let content = fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;
    let activities = parse_activities(&content, tz)?;
    log::info!("Loaded {} activities from {}", activities.len(), path.display());
    Ok(activities)
}

fn activity_from_row(
    row: RawActivity,
    id: Option<String>,
    tz: &Tz,
) -> Result<Activity, PlannerError> {
    let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let start_time = parse_optional(&id, "startTime", row.start_time.as_deref(), tz)?;
    let end_time = parse_optional(&id, "endTime", row.end_time.as_deref(), tz)?;

    // Only an explicit day is stored; the itinerary derives the rest from the
    // start time in whatever zone it is viewed in.
    let day = non_blank(row.day.as_deref()).map(parse_day).transpose()?;

    Ok(Activity {
        id,
        title: row.title.unwrap_or_default(),
        day,
        start_time,
        end_time,
        position: row.position.unwrap_or_default(),
        location: row.location,
        notes: row.notes,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_optional(
    id: &str,
    field: &'static str,
    value: Option<&str>,
    tz: &Tz,
) -> Result<Option<DateTime<Utc>>, PlannerError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    parse_timestamp(value, tz)
        .map(Some)
        .map_err(|_| PlannerError::InvalidTimestamp {
            id: id.to_string(),
            field,
            value: value.to_string(),
        })
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_day(value: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::InvalidDate(value.to_string()))
}

/// Parse an activity timestamp.
///
/// RFC 3339 values keep their own offset. Values without an offset are read
/// as local time in `tz`.
pub fn parse_timestamp(value: &str, tz: &Tz) -> Result<DateTime<Utc>, PlannerError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(resolve_local(tz, naive));
        }
    }

    Err(PlannerError::InvalidTimestamp {
        id: String::new(),
        field: "timestamp",
        value: value.to_string(),
    })
}

/// Resolve a local wall-clock time to an instant, handling DST transitions.
///
/// Ambiguous times (fall-back) take the earlier instant. Times inside a
/// spring-forward gap don't exist and are shifted forward by an hour.
fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }

    let shifted = naive + Duration::hours(1);
    if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
        log::warn!(
            "DST gap detected for {} in {}; using post-transition time",
            naive,
            tz
        );
        return dt.with_timezone(&Utc);
    }

    log::warn!(
        "Could not resolve local datetime {} in {}; falling back to UTC",
        naive,
        tz
    );
    Utc.from_utc_datetime(&naive)
}
