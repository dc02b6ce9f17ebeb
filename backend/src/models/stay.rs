//! Stay windows and the reservation overlap rule.
//!
//! Reservations are half-open `[start, end)`. A reservation is considered
//! active against a window `[move_in, move_out]` unless it ends on or before
//! `move_in`, or starts strictly after `move_out`:
//!
//! ```text
//! overlaps = NOT (end <= move_in OR start > move_out)
//! ```
//!
//! A reservation starting exactly on `move_out` therefore still overlaps.
//! The Postgres repository spells the same predicate out in SQL; keep both
//! in sync.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::Reservation;

/// Query window tested against reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayWindow {
    pub move_in: NaiveDate,
    pub move_out: NaiveDate,
}

impl StayWindow {
    pub fn new(move_in: NaiveDate, move_out: NaiveDate) -> Self {
        Self { move_in, move_out }
    }

    /// Single-day window, used for "reserved at date" checks.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Whether a `[start, end)` interval is active against this window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        !(end <= self.move_in || start > self.move_out)
    }

    pub fn overlaps_reservation(&self, reservation: &Reservation) -> bool {
        self.overlaps(reservation.start, reservation.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn days(n: i64) -> Duration {
        Duration::days(n)
    }

    #[test]
    fn test_reservation_spanning_window_end_overlaps() {
        let d = today();
        let window = StayWindow::new(d - days(10), d - days(1));
        assert!(window.overlaps(d - days(1), d + days(1)));
    }

    #[test]
    fn test_reservation_inside_window_overlaps() {
        let d = today();
        let window = StayWindow::new(d - days(10), d - days(1));
        assert!(window.overlaps(d - days(2), d - days(1)));
    }

    #[test]
    fn test_future_reservation_does_not_overlap() {
        let d = today();
        let window = StayWindow::new(d - days(10), d - days(1));
        assert!(!window.overlaps(d + days(1), d + days(2)));
    }

    #[test]
    fn test_end_equal_to_move_in_is_excluded() {
        let d = today();
        let window = StayWindow::on(d - days(1));
        assert!(!window.overlaps(d - days(2), d - days(1)));
        assert!(!StayWindow::on(d).overlaps(d - days(2), d - days(1)));
    }

    #[test]
    fn test_start_equal_to_move_out_is_included() {
        let d = today();
        let window = StayWindow::new(d - days(3), d);
        assert!(window.overlaps(d, d + days(2)));
        assert!(!window.overlaps(d + days(1), d + days(2)));
    }

    #[test]
    fn test_point_window_matches_free_room_dates() {
        let start = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 6, 16).unwrap();
        assert!(StayWindow::on(start).overlaps(start, end));
        assert!(!StayWindow::on(end).overlaps(start, end));
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..400).prop_map(|offset| today() + Duration::days(offset - 200))
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_exclusion_rule(
            move_in in arb_date(),
            move_out in arb_date(),
            start in arb_date(),
            len in 0i64..30,
        ) {
            let end = start + Duration::days(len);
            let window = StayWindow::new(move_in, move_out);
            let excluded = end <= move_in || start > move_out;
            prop_assert_eq!(window.overlaps(start, end), !excluded);
        }

        #[test]
        fn prop_empty_reservation_never_overlaps_its_own_day(day in arb_date()) {
            prop_assert!(!StayWindow::on(day).overlaps(day, day));
        }
    }
}
