//! Itinerary overlap detection.
//!
//! Flags every interval whose half-open `[start, end)` range shares at least
//! one instant with another interval. Intervals missing either bound, and
//! intervals that cover no time at all (`start >= end`), are reported as
//! non-overlapping and never cause another interval to be flagged.
//!
//! The detector is a sweep over intervals sorted by start time, keeping an
//! active set of earlier intervals that have not yet ended. Input order does
//! not matter.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Per-id overlap flags, one entry for every id passed to [`compute_overlaps`].
pub type OverlapMap = HashMap<String, bool>;

/// Lightweight time range projected from a scheduled activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub id: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Interval {
    pub fn new(
        id: impl Into<String>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    /// An interval with neither bound set.
    pub fn unbounded(id: impl Into<String>) -> Self {
        Self::new(id, None, None)
    }

    /// True when both `start` and `end` are present.
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The `(start, end)` pair when the interval occupies a non-empty span.
    fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }

    /// Pairwise overlap test: `self.start < other.end && other.start < self.end`.
    ///
    /// Unbounded and zero-width intervals never overlap anything.
    pub fn overlaps(&self, other: &Interval) -> bool {
        match (self.span(), other.span()) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => a_start < b_end && b_start < a_end,
            _ => false,
        }
    }
}

/// Compute the overlap flag for every interval.
///
/// Every input id appears in the result. Duplicate ids are tolerated: the
/// flag of the last occurrence in input order wins.
pub fn compute_overlaps(intervals: &[Interval]) -> OverlapMap {
    let mut flags = vec![false; intervals.len()];

    // (start, end, input index); the index keeps the sort total and stable.
    let mut sweep: Vec<(DateTime<Utc>, DateTime<Utc>, usize)> = intervals
        .iter()
        .enumerate()
        .filter_map(|(idx, interval)| interval.span().map(|(start, end)| (start, end, idx)))
        .collect();
    sweep.sort_unstable();

    // (end, input index) of intervals that may still overlap later starts.
    let mut active: Vec<(DateTime<Utc>, usize)> = Vec::new();

    for (start, end, idx) in sweep {
        active.retain(|(active_end, _)| *active_end > start);

        if !active.is_empty() {
            for (_, other) in &active {
                flags[*other] = true;
            }
            flags[idx] = true;
        }

        active.push((end, idx));
    }

    let mut result = OverlapMap::with_capacity(intervals.len());
    for (interval, flag) in intervals.iter().zip(flags) {
        result.insert(interval.id.clone(), flag);
    }
    result
}

/// Ids flagged as overlapping, sorted.
pub fn overlapping_ids(intervals: &[Interval]) -> Vec<String> {
    let mut ids: Vec<String> = compute_overlaps(intervals)
        .into_iter()
        .filter_map(|(id, overlap)| overlap.then_some(id))
        .collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    fn iv(id: &str, start: (u32, u32), end: (u32, u32)) -> Interval {
        Interval::new(id, Some(at(start.0, start.1)), Some(at(end.0, end.1)))
    }

    /// All orderings of `items` (Heap's algorithm).
    fn permutations(items: &[Interval]) -> Vec<Vec<Interval>> {
        fn heap(k: usize, items: &mut Vec<Interval>, out: &mut Vec<Vec<Interval>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            heap(k - 1, items, out);
            for i in 0..k - 1 {
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
                heap(k - 1, items, out);
            }
        }

        let mut items = items.to_vec();
        let mut out = Vec::new();
        let len = items.len();
        heap(len, &mut items, &mut out);
        out
    }

    #[test]
    fn empty_input_returns_empty_map() {
        assert!(compute_overlaps(&[]).is_empty());
    }

    #[test]
    fn single_interval_never_overlaps() {
        let result = compute_overlaps(&[iv("a", (10, 0), (11, 0))]);
        assert_eq!(result.len(), 1);
        assert!(!result["a"]);
    }

    #[test]
    fn null_start_is_false_regardless_of_others() {
        let intervals = vec![
            Interval::new("a", None, Some(at(11, 0))),
            iv("b", (9, 0), (12, 0)),
        ];
        let result = compute_overlaps(&intervals);
        assert!(!result["a"]);
        assert!(!result["b"]);
    }

    #[test]
    fn null_end_is_false() {
        let intervals = vec![
            Interval::new("a", Some(at(10, 0)), None),
            iv("b", (9, 0), (12, 0)),
        ];
        assert!(!intervals[0].is_bounded());
        assert!(intervals[1].is_bounded());
        let result = compute_overlaps(&intervals);
        assert!(!result["a"]);
        assert!(!result["b"]);
    }

    #[test]
    fn both_null_is_false() {
        let intervals = vec![Interval::unbounded("a"), Interval::unbounded("b")];
        assert!(!intervals[0].is_bounded());
        assert!(!intervals[0].overlaps(&intervals[1]));
        let result = compute_overlaps(&intervals);
        assert_eq!(result.len(), 2);
        assert!(result.values().all(|overlap| !overlap));
    }

    #[test]
    fn identical_intervals_all_overlap() {
        let intervals = vec![
            iv("a", (10, 0), (11, 0)),
            iv("b", (10, 0), (11, 0)),
            iv("c", (10, 0), (11, 0)),
        ];
        let result = compute_overlaps(&intervals);
        assert!(result.values().all(|overlap| *overlap));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let intervals = vec![iv("a", (10, 0), (11, 0)), iv("b", (11, 0), (12, 0))];
        let result = compute_overlaps(&intervals);
        assert!(!result["a"]);
        assert!(!result["b"]);
    }

    #[test]
    fn simple_overlap_flags_both() {
        let intervals = vec![iv("a", (10, 0), (11, 0)), iv("b", (10, 30), (11, 30))];
        let result = compute_overlaps(&intervals);
        assert!(result["a"]);
        assert!(result["b"]);
    }

    #[test]
    fn chained_overlap_flags_every_link() {
        let a = iv("a", (10, 0), (11, 30));
        let b = iv("b", (11, 0), (12, 30));
        let c = iv("c", (12, 0), (13, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&c));

        let result = compute_overlaps(&[a, b, c]);
        assert!(result["a"]);
        assert!(result["b"]);
        assert!(result["c"]);
    }

    #[test]
    fn zero_duration_never_overlaps() {
        let intervals = vec![
            iv("point", (10, 30), (10, 30)),
            iv("span", (10, 0), (11, 0)),
            iv("edge", (11, 0), (11, 0)),
        ];
        let result = compute_overlaps(&intervals);
        assert!(!result["point"]);
        assert!(!result["span"]);
        assert!(!result["edge"]);
    }

    #[test]
    fn reversed_bounds_are_inert() {
        let intervals = vec![iv("backwards", (12, 0), (9, 0)), iv("b", (10, 0), (11, 0))];
        let result = compute_overlaps(&intervals);
        assert!(!result["backwards"]);
        assert!(!result["b"]);
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let fixed = vec![
            iv("a", (9, 0), (10, 0)),
            iv("b", (9, 30), (10, 30)),
            iv("c", (10, 30), (11, 0)),
            iv("d", (10, 45), (12, 0)),
            Interval::new("e", Some(at(9, 15)), None),
        ];
        let expected = compute_overlaps(&fixed);
        assert_eq!(expected["a"], true);
        assert_eq!(expected["b"], true);
        assert_eq!(expected["c"], true);
        assert_eq!(expected["d"], true);
        assert_eq!(expected["e"], false);

        let orderings = permutations(&fixed);
        assert_eq!(orderings.len(), 120);
        for ordering in orderings {
            assert_eq!(compute_overlaps(&ordering), expected);
        }
    }

    #[test]
    fn millisecond_overlap_is_detected() {
        let b_start = at(11, 0);
        let a = Interval::new(
            "a",
            Some(at(10, 0)),
            Some(b_start + Duration::milliseconds(1)),
        );
        let b = Interval::new("b", Some(b_start), Some(at(12, 0)));
        let result = compute_overlaps(&[a, b]);
        assert!(result["a"]);
        assert!(result["b"]);
    }

    #[test]
    fn long_lived_interval_stays_active_past_short_ones() {
        let intervals = vec![
            iv("all-day", (8, 0), (18, 0)),
            iv("early", (9, 0), (9, 30)),
            iv("late", (16, 0), (17, 0)),
        ];
        let result = compute_overlaps(&intervals);
        assert!(result.values().all(|overlap| *overlap));
    }

    #[test]
    fn duplicate_ids_do_not_panic() {
        let intervals = vec![
            iv("dup", (10, 0), (11, 0)),
            iv("other", (10, 30), (11, 30)),
            iv("dup", (13, 0), (14, 0)),
        ];
        let result = compute_overlaps(&intervals);
        assert_eq!(result.len(), 2);
        // Last occurrence of "dup" does not overlap anything.
        assert!(!result["dup"]);
        assert!(result["other"]);
    }

    #[test]
    fn sequential_intervals_at_scale_are_fast_and_clear() {
        let base = at(0, 0);
        let intervals: Vec<Interval> = (0..100)
            .map(|i| {
                let start = base + Duration::minutes(i * 10);
                Interval::new(
                    format!("seq-{}", i),
                    Some(start),
                    Some(start + Duration::minutes(10)),
                )
            })
            .collect();

        let started = std::time::Instant::now();
        let result = compute_overlaps(&intervals);
        assert!(started.elapsed() < std::time::Duration::from_millis(100));
        assert_eq!(result.len(), 100);
        assert!(result.values().all(|overlap| !overlap));
    }

    #[test]
    fn fully_overlapping_set_is_all_true() {
        let intervals: Vec<Interval> = (0..10)
            .map(|i| {
                Interval::new(
                    format!("stack-{}", i),
                    Some(at(9, i)),
                    Some(at(17, 0)),
                )
            })
            .collect();
        let result = compute_overlaps(&intervals);
        assert_eq!(result.len(), 10);
        assert!(result.values().all(|overlap| *overlap));
    }

    #[test]
    fn overlapping_ids_are_sorted() {
        let intervals = vec![
            iv("zeta", (10, 0), (11, 0)),
            iv("alpha", (10, 30), (11, 30)),
            iv("mid", (14, 0), (15, 0)),
        ];
        assert_eq!(overlapping_ids(&intervals), vec!["alpha", "zeta"]);
    }
}
