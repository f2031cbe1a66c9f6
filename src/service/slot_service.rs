use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::interval::{TimeRange, coalesce, local_to_utc};

/// Work-window bounds and slot granularity for free-slot search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub granularity: Duration,
}

impl Default for SlotConfig {
    fn default() -> Self {
        SlotConfig {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            granularity: Duration::minutes(60),
        }
    }
}

/// Steps through the work window at fixed granularity and returns the start
/// of every candidate window `[t, t+granularity)` that overlaps no busy
/// interval, in ascending order.
///
/// A candidate that only abuts a busy interval is free. The last candidate
/// may extend past `work_end`; it is still evaluated at its nominal step.
/// An empty result is valid and means the day is fully booked.
pub fn compute_free_slots(
    date: NaiveDate,
    busy: &[TimeRange],
    config: &SlotConfig,
    tz: Tz,
) -> Vec<NaiveTime> {
    let busy = coalesce(busy.to_vec());
    let mut free = Vec::new();
    let mut current = date.and_time(config.work_start);
    let end_of_day = date.and_time(config.work_end);

    while current < end_of_day {
        let candidate = TimeRange::new(
            local_to_utc(current, tz),
            local_to_utc(current + config.granularity, tz),
        );
        if !busy.iter().any(|b| b.overlaps(&candidate)) {
            free.push(current.time());
        }
        current += config.granularity;
    }

    free
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::local_to_utc;
    use chrono_tz::Asia::Tehran;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    fn busy(start: NaiveTime, end: NaiveTime) -> TimeRange {
        TimeRange::new(
            local_to_utc(day().and_time(start), Tehran),
            local_to_utc(day().and_time(end), Tehran),
        )
    }

    #[test]
    fn empty_calendar_yields_every_step() {
        let slots = compute_free_slots(day(), &[], &SlotConfig::default(), Tehran);
        let expected: Vec<NaiveTime> = (9..17).map(|h| hm(h, 0)).collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn busy_morning_hour_is_excluded() {
        let config = SlotConfig {
            work_start: hm(9, 0),
            work_end: hm(12, 0),
            granularity: Duration::minutes(60),
        };
        let slots = compute_free_slots(day(), &[busy(hm(9, 0), hm(10, 0))], &config, Tehran);
        assert_eq!(slots, vec![hm(10, 0), hm(11, 0)]);
    }

    #[test]
    fn fully_booked_day_yields_no_slots() {
        let slots = compute_free_slots(
            day(),
            &[busy(hm(9, 0), hm(17, 0))],
            &SlotConfig::default(),
            Tehran,
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn partial_overlap_blocks_the_whole_candidate() {
        let config = SlotConfig {
            work_start: hm(9, 0),
            work_end: hm(12, 0),
            granularity: Duration::minutes(60),
        };
        // 09:30-10:30 collides with both the 09:00 and the 10:00 window.
        let slots = compute_free_slots(day(), &[busy(hm(9, 30), hm(10, 30))], &config, Tehran);
        assert_eq!(slots, vec![hm(11, 0)]);
    }

    #[test]
    fn abutting_interval_leaves_neighbouring_slots_free() {
        let config = SlotConfig {
            work_start: hm(9, 0),
            work_end: hm(12, 0),
            granularity: Duration::minutes(60),
        };
        let slots = compute_free_slots(day(), &[busy(hm(10, 0), hm(11, 0))], &config, Tehran);
        assert_eq!(slots, vec![hm(9, 0), hm(11, 0)]);
    }

    #[test]
    fn last_step_is_evaluated_even_when_it_passes_work_end() {
        let config = SlotConfig {
            work_start: hm(9, 0),
            work_end: hm(10, 30),
            granularity: Duration::minutes(60),
        };
        // The 10:00 window runs to 11:00, past work_end, and is still a
        // candidate at its nominal step.
        let slots = compute_free_slots(day(), &[], &config, Tehran);
        assert_eq!(slots, vec![hm(9, 0), hm(10, 0)]);
    }
}
