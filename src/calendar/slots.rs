//! Free-slot finder: gaps in the day's busy intervals bounded by the
//! working-hours window

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::error::{CalendarError, Result};
use super::event::{FreeSlot, WorkingHours};
use super::reader::MultiCalendarReader;

/// How many slots to offer when the caller doesn't say.
pub const DEFAULT_SLOT_LIMIT: usize = 5;

/// Find up to `limit` open slots of `duration_minutes` on a calendar
/// day, inside the working-hours window. Fully materialized before
/// returning; every call recomputes from a fresh read.
pub async fn find_open_slots(
    reader: &MultiCalendarReader,
    date: NaiveDate,
    duration_minutes: i64,
    limit: usize,
    hours: WorkingHours,
) -> Result<Vec<FreeSlot>> {
    if duration_minutes <= 0 {
        return Err(CalendarError::InvalidInput(format!(
            "duration must be positive, got {}",
            duration_minutes
        )));
    }
    if limit == 0 {
        return Ok(vec![]);
    }

    let events = reader.list_events_for_day(date).await?;
    // Pure all-day events don't block any specific hour
    let busy: Vec<(DateTime<Utc>, DateTime<Utc>)> = events
        .iter()
        .filter(|e| !e.all_day)
        .map(|e| (e.start, e.end))
        .collect();

    let (window_start, window_end) = hours.window_for(date, reader.tz());
    Ok(sweep(
        window_start,
        window_end,
        busy,
        Duration::minutes(duration_minutes),
        limit,
    ))
}

/// Greedy earliest-slot-per-gap sweep. Each gap that fits the
/// duration yields exactly one slot at its earliest position, never
/// every possible placement within a larger gap.
pub fn sweep(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    mut busy: Vec<(DateTime<Utc>, DateTime<Utc>)>,
    duration: Duration,
    limit: usize,
) -> Vec<FreeSlot> {
    // The reader sorts its output, but the busy list may not have
    // come from that exact path
    busy.sort_by_key(|&(start, _)| start);

    let mut slots = Vec::new();
    let mut cursor = window_start;

    for (start, end) in busy {
        if slots.len() >= limit || cursor >= window_end {
            return slots;
        }
        // Already behind the cursor: overlapping or duplicate events
        // from independent sources
        if end <= cursor {
            continue;
        }
        // An interval can start past the end of the window; the gap
        // before it is still bounded by the window
        let gap_end = start.min(window_end);
        if gap_end - cursor >= duration {
            slots.push(FreeSlot {
                start: cursor,
                end: cursor + duration,
            });
        }
        // Never move the cursor backward; an interval can start
        // before the window and end inside it
        cursor = cursor.max(end);
    }

    if slots.len() < limit && window_end - cursor >= duration {
        slots.push(FreeSlot {
            start: cursor,
            end: cursor + duration,
        });
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::testing::{StaticBackend, event_at, reader_over};
    use chrono::{NaiveDate, TimeZone};

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, 0, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn it_returns_one_slot_for_an_empty_day() {
        let slots = sweep(hour(8), hour(22), vec![], Duration::minutes(30), 5);
        assert_eq!(
            slots,
            vec![FreeSlot {
                start: hour(8),
                end: hour(8) + Duration::minutes(30),
            }]
        );
    }

    #[test]
    fn it_returns_nothing_when_duration_exceeds_the_window() {
        let slots = sweep(hour(8), hour(10), vec![], Duration::minutes(180), 5);
        assert!(slots.is_empty());
    }

    #[test]
    fn it_emits_no_slot_between_back_to_back_events() {
        let busy = vec![(hour(9), hour(10)), (hour(10), hour(11))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(60), 5);
        assert_eq!(
            slots,
            vec![
                FreeSlot { start: hour(8), end: hour(9) },
                FreeSlot { start: hour(11), end: hour(12) },
            ]
        );
    }

    /// A gap twice the duration still yields a single slot at its
    /// earliest position.
    #[test]
    fn it_emits_one_slot_per_gap() {
        let busy = vec![(hour(9), hour(10)), (hour(14), hour(15))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(60), 5);
        assert_eq!(
            slots,
            vec![
                FreeSlot { start: hour(8), end: hour(9) },
                FreeSlot { start: hour(10), end: hour(11) },
                FreeSlot { start: hour(15), end: hour(16) },
            ]
        );
    }

    /// An event straddling the window start must push the cursor
    /// forward, never backward.
    #[test]
    fn it_advances_past_an_event_straddling_the_window_start() {
        let busy = vec![(hour(7), hour(9))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(30), 1);
        assert_eq!(
            slots,
            vec![FreeSlot {
                start: hour(9),
                end: hour(9) + Duration::minutes(30),
            }]
        );
    }

    #[test]
    fn it_skips_intervals_swallowed_by_an_earlier_one() {
        // Duplicate-ish events from two accounts: the second ends
        // before the cursor after the first
        let busy = vec![(hour(9), hour(12)), (hour(10), hour(11))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(60), 2);
        assert_eq!(
            slots,
            vec![
                FreeSlot { start: hour(8), end: hour(9) },
                FreeSlot { start: hour(12), end: hour(13) },
            ]
        );
    }

    #[test]
    fn it_stops_at_the_limit() {
        let busy = vec![(hour(9), hour(10)), (hour(11), hour(12)), (hour(13), hour(14))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(30), 2);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, hour(8));
        assert_eq!(slots[1].start, hour(10));
    }

    /// A busy interval starting after the window's end must not open
    /// a gap that spills past the window.
    #[test]
    fn it_clamps_the_gap_before_an_out_of_window_interval() {
        let half_past_nine_pm = Utc.with_ymd_and_hms(2025, 6, 2, 21, 30, 0).unwrap();
        let busy = vec![(hour(9), half_past_nine_pm), (hour(22) + Duration::minutes(30), hour(23))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(45), 10);

        // 08:00 before the first interval; the 30 minutes left before
        // the window closes don't fit
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, hour(8));
    }

    /// Every emitted slot lies inside the window, has exactly the
    /// requested length, and overlaps no busy interval.
    #[test]
    fn it_only_emits_contained_non_overlapping_slots() {
        let busy = vec![
            (hour(7), hour(9)),
            (hour(9), hour(10)),
            (hour(12), hour(13)),
            (hour(12), hour(14)),
            (hour(21), hour(23)),
        ];
        let duration = Duration::minutes(45);
        let slots = sweep(hour(8), hour(22), busy.clone(), duration, 10);

        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.start >= hour(8));
            assert!(slot.end <= hour(22));
            assert_eq!(slot.end - slot.start, duration);
            for (busy_start, busy_end) in &busy {
                assert!(slot.end <= *busy_start || slot.start >= *busy_end);
            }
        }
    }

    #[test]
    fn it_resorts_unsorted_busy_intervals() {
        let busy = vec![(hour(14), hour(15)), (hour(9), hour(10))];
        let slots = sweep(hour(8), hour(22), busy, Duration::minutes(60), 1);
        assert_eq!(slots, vec![FreeSlot { start: hour(8), end: hour(9) }]);
    }

    /// Worked example: A(09:00-10:00) and C(14:00-15:00) on one
    /// account, B(09:30-09:45) on another, working hours 08:00-22:00,
    /// 30 minute slots.
    #[tokio::test]
    async fn it_finds_slots_across_three_sources() {
        let reader = reader_over(vec![
            StaticBackend::with_events("work", vec![event_at("a", "work", 9, 10)]),
            StaticBackend::with_events("personal", vec![{
                let mut b = event_at("b", "personal", 9, 10);
                b.start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
                b.end = Utc.with_ymd_and_hms(2025, 6, 2, 9, 45, 0).unwrap();
                b
            }]),
            StaticBackend::with_events("family", vec![event_at("c", "family", 14, 15)]),
        ]);

        let hours = WorkingHours::new(8, 22);
        let slots = find_open_slots(&reader, date(), 30, 3, hours).await.unwrap();

        assert_eq!(
            slots,
            vec![
                FreeSlot { start: hour(8), end: hour(8) + Duration::minutes(30) },
                FreeSlot { start: hour(10), end: hour(10) + Duration::minutes(30) },
                FreeSlot { start: hour(15), end: hour(15) + Duration::minutes(30) },
            ]
        );
    }

    #[tokio::test]
    async fn it_ignores_all_day_events() {
        let mut all_day = event_at("holiday", "work", 0, 23);
        all_day.all_day = true;
        let reader = reader_over(vec![StaticBackend::with_events("work", vec![all_day])]);

        let hours = WorkingHours::new(8, 22);
        let slots = find_open_slots(&reader, date(), 30, 5, hours).await.unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, hour(8));
    }

    #[tokio::test]
    async fn it_short_circuits_on_zero_limit() {
        let reader = reader_over(vec![StaticBackend::failing("broken")]);
        let hours = WorkingHours::new(8, 22);
        // Zero limit returns before any source is read, so even a
        // fully failing reader yields an empty result
        let slots = find_open_slots(&reader, date(), 30, 0, hours).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn it_rejects_non_positive_durations() {
        let reader = reader_over(vec![]);
        let hours = WorkingHours::new(8, 22);
        let err = find_open_slots(&reader, date(), 0, 5, hours).await.unwrap_err();
        assert!(matches!(err, CalendarError::InvalidInput(_)));
    }
}
