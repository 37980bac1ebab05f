//! Per-day itinerary assembly.
//!
//! Selects the activities filed under a day, runs overlap detection on them,
//! and merges the `overlap` flag back onto each record.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::overlap::{compute_overlaps, Interval};
use crate::types::{Activity, ActivityView, ItineraryDay, ItineraryReport};

/// The local date an activity belongs to: its explicit `day`, else the date
/// of its start time in `tz`. `None` for activities with neither.
pub fn activity_day(activity: &Activity, tz: &Tz) -> Option<NaiveDate> {
    activity
        .day
        .or_else(|| activity.start_time.map(|start| start.with_timezone(tz).date_naive()))
}

/// Attach overlap flags, preserving input order.
pub fn annotate_overlaps(activities: Vec<Activity>) -> Vec<ActivityView> {
    let intervals: Vec<Interval> = activities.iter().map(Activity::interval).collect();
    let overlaps = compute_overlaps(&intervals);

    let views: Vec<ActivityView> = activities
        .into_iter()
        .map(|activity| {
            let overlap = overlaps.get(&activity.id).copied().unwrap_or(false);
            ActivityView { activity, overlap }
        })
        .collect();

    log::debug!(
        "Overlap check: {} of {} activities conflict",
        views.iter().filter(|v| v.overlap).count(),
        views.len()
    );
    views
}

/// Display order within a day: manual position, then start time (unscheduled
/// last), then id.
fn day_order(a: &Activity, b: &Activity) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| match (a.start_time, b.start_time) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

fn build_day(date: NaiveDate, mut activities: Vec<Activity>) -> ItineraryDay {
    activities.sort_by(day_order);
    let activities = annotate_overlaps(activities);
    let overlap_count = activities.iter().filter(|v| v.overlap).count();
    ItineraryDay {
        date,
        activities,
        overlap_count,
    }
}

/// The itinerary for one local date.
pub fn day_itinerary(activities: &[Activity], day: NaiveDate, tz: &Tz) -> ItineraryDay {
    let selected: Vec<Activity> = activities
        .iter()
        .filter(|a| activity_day(a, tz) == Some(day))
        .cloned()
        .collect();
    build_day(day, selected)
}

/// Every day with at least one activity, ascending. Overlaps are computed
/// within each day only.
pub fn group_by_day(activities: &[Activity], tz: &Tz) -> Vec<ItineraryDay> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
    for activity in activities {
        if let Some(day) = activity_day(activity, tz) {
            by_day.entry(day).or_default().push(activity.clone());
        }
    }

    by_day
        .into_iter()
        .map(|(date, day_activities)| build_day(date, day_activities))
        .collect()
}

/// Activities that are not filed under any day.
pub fn unscheduled(activities: &[Activity], tz: &Tz) -> Vec<Activity> {
    activities
        .iter()
        .filter(|a| activity_day(a, tz).is_none())
        .cloned()
        .collect()
}

pub fn build_report(activities: &[Activity], tz: &Tz) -> ItineraryReport {
    let report = ItineraryReport {
        days: group_by_day(activities, tz),
        unscheduled: unscheduled(activities, tz),
    };
    log::info!(
        "Built itinerary: {} days, {} unscheduled, {} overlapping",
        report.days.len(),
        report.unscheduled.len(),
        report.days.iter().map(|d| d.overlap_count).sum::<usize>()
    );
    report
}
