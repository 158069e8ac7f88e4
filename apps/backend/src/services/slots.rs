//! Bookable slot generation.
//!
//! Expands an offer's weekly availability windows into concrete start times
//! for one calendar day and removes anything colliding with an existing
//! appointment. Pure computation; the route handler supplies the data.

use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, Time};

/// A weekly recurring window. `weekday` is 0 (Sunday) through 6 (Saturday).
#[derive(Debug, Clone)]
pub struct AvailabilityWindow {
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub duration_minutes: i32,
}

/// An interval already taken by an appointment.
#[derive(Debug, Clone)]
pub struct BookedInterval {
    pub starts_at: OffsetDateTime,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub duration_minutes: i32,
}

/// Free slots on `date`, UTC. Windows for other weekdays contribute nothing;
/// a slot must fit entirely inside its window.
pub fn free_slots(
    date: Date,
    windows: &[AvailabilityWindow],
    booked: &[BookedInterval],
) -> Vec<Slot> {
    let weekday = i32::from(date.weekday().number_days_from_sunday());
    let midnight = date.with_time(Time::MIDNIGHT).assume_utc();

    let mut slots: Vec<Slot> = Vec::new();

    for window in windows {
        if window.weekday != weekday || window.duration_minutes <= 0 {
            continue;
        }

        let mut minute = window.start_minute;
        while minute + window.duration_minutes <= window.end_minute {
            let starts_at = midnight + Duration::minutes(i64::from(minute));
            let slot = Slot {
                starts_at,
                duration_minutes: window.duration_minutes,
            };

            if !booked.iter().any(|b| collides(&slot, b)) {
                slots.push(slot);
            }

            minute += window.duration_minutes;
        }
    }

    slots.sort_by_key(|s| s.starts_at);
    slots.dedup_by_key(|s| s.starts_at);
    slots
}

fn collides(slot: &Slot, booked: &BookedInterval) -> bool {
    let slot_end = slot.starts_at + Duration::minutes(i64::from(slot.duration_minutes));
    let booked_end = booked.starts_at + Duration::minutes(i64::from(booked.duration_minutes));
    slot.starts_at < booked_end && booked.starts_at < slot_end
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::{Duration, OffsetDateTime, Time};

    use super::{free_slots, AvailabilityWindow, BookedInterval};

    // 2025-08-04 is a Monday (weekday 1)
    const MONDAY: time::Date = date!(2025 - 08 - 04);

    fn at_minute(minute: i64) -> OffsetDateTime {
        MONDAY.with_time(Time::MIDNIGHT).assume_utc() + Duration::minutes(minute)
    }

    fn window(weekday: i32, start: i32, end: i32, duration: i32) -> AvailabilityWindow {
        AvailabilityWindow {
            weekday,
            start_minute: start,
            end_minute: end,
            duration_minutes: duration,
        }
    }

    #[test]
    fn expands_a_window_into_steps() {
        // 09:00-11:00, hour-long slots
        let slots = free_slots(MONDAY, &[window(1, 540, 660, 60)], &[]);

        assert_eq!(
            slots.iter().map(|s| s.starts_at).collect::<Vec<_>>(),
            vec![at_minute(540), at_minute(600)]
        );
    }

    #[test]
    fn slot_must_fit_inside_the_window() {
        // 09:00-10:30 with 60-minute slots: 09:30-10:30 would fit, 10:00 would not
        let slots = free_slots(MONDAY, &[window(1, 540, 630, 60)], &[]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].starts_at, at_minute(540));
    }

    #[test]
    fn other_weekdays_contribute_nothing() {
        let slots = free_slots(MONDAY, &[window(2, 540, 660, 60)], &[]);
        assert!(slots.is_empty());
    }

    #[test]
    fn booked_slots_are_removed() {
        let booked = vec![BookedInterval {
            starts_at: at_minute(540),
            duration_minutes: 60,
        }];

        let slots = free_slots(MONDAY, &[window(1, 540, 660, 60)], &booked);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].starts_at, at_minute(600));
    }

    #[test]
    fn partial_overlap_also_blocks() {
        // appointment 09:30-10:30 straddles both hour slots
        let booked = vec![BookedInterval {
            starts_at: at_minute(570),
            duration_minutes: 60,
        }];

        let slots = free_slots(MONDAY, &[window(1, 540, 660, 60)], &booked);
        assert!(slots.is_empty());
    }

    #[test]
    fn back_to_back_appointment_does_not_block() {
        // appointment 08:00-09:00 ends exactly when the first slot starts
        let booked = vec![BookedInterval {
            starts_at: at_minute(480),
            duration_minutes: 60,
        }];

        let slots = free_slots(MONDAY, &[window(1, 540, 660, 60)], &booked);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn overlapping_windows_dedup() {
        let windows = vec![window(1, 540, 660, 60), window(1, 540, 600, 60)];

        let slots = free_slots(MONDAY, &windows, &[]);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn degenerate_windows_yield_nothing() {
        // zero-length and inverted windows
        let windows = vec![window(1, 540, 540, 60), window(1, 660, 540, 60), window(1, 540, 660, 0)];
        assert!(free_slots(MONDAY, &windows, &[]).is_empty());
    }
}
