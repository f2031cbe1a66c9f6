use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Half-open time range `[start, end)` over UTC instants. Busy intervals
/// pulled from the calendar and candidate slot windows both use this shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeRange { start, end }
    }

    /// Half-open overlap test. Ranges that only share an endpoint do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Half-open containment: `start <= point < end`.
    pub fn covers(&self, point: DateTime<Utc>) -> bool {
        self.start <= point && point < self.end
    }

    /// Union of two ranges when they overlap or abut; `None` when disjoint.
    pub fn merge(&self, other: &TimeRange) -> Option<TimeRange> {
        if self.start > other.end || other.start > self.end {
            return None;
        }
        Some(TimeRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }
}

/// Sorts ranges by start and folds adjacent/overlapping ones together.
pub fn coalesce(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) => {
                if let Some(joined) = last.merge(&range) {
                    *last = joined;
                } else {
                    merged.push(range);
                }
            }
            None => merged.push(range),
        }
    }
    merged
}

/// Resolves a wall-clock datetime in `tz`. Ambiguous or skipped local times
/// (DST transitions) fall back to reading the naive value as UTC.
pub fn local_in_tz(local: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    tz.from_local_datetime(&local)
        .single()
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}

pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    local_in_tz(local, tz).with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, hour, min, 0).unwrap()
    }

    fn range(start_h: u32, end_h: u32) -> TimeRange {
        TimeRange::new(at(start_h, 0), at(end_h, 0))
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = range(9, 11);
        let b = range(10, 12);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn range_overlaps_itself() {
        let a = range(9, 10);
        assert!(a.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let a = range(9, 10);
        let b = range(10, 11);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn covers_is_half_open() {
        let a = range(9, 10);
        assert!(a.covers(at(9, 0)));
        assert!(a.covers(at(9, 59)));
        assert!(!a.covers(at(10, 0)));
    }

    #[test]
    fn merge_joins_abutting_ranges() {
        let a = range(9, 10);
        let b = range(10, 11);
        assert_eq!(a.merge(&b), Some(range(9, 11)));
    }

    #[test]
    fn merge_rejects_disjoint_ranges() {
        let a = range(9, 10);
        let b = range(11, 12);
        assert_eq!(a.merge(&b), None);
    }

    #[test]
    fn coalesce_folds_overlapping_and_keeps_gaps() {
        let merged = coalesce(vec![range(12, 13), range(9, 10), range(10, 11)]);
        assert_eq!(merged, vec![range(9, 11), range(12, 13)]);
    }
}
