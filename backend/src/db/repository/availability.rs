//! Availability repository trait for read-only booking queries.
//!
//! All queries evaluate reservations with the rule in
//! [`StayWindow::overlaps`](crate::models::StayWindow::overlaps). They never
//! fail because nothing matched; an empty vec is returned instead.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{HotelSummary, RoomAvailability, User};

/// Repository trait for availability queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Annotate every room with whether it is sold out for a stay.
    ///
    /// A room is sold out iff at least one of its reservations overlaps
    /// `[move_in, move_out]`. The result holds exactly one row per room,
    /// ordered by room ID, regardless of how many reservations a room has.
    async fn get_rooms(
        &self,
        move_in: NaiveDate,
        move_out: NaiveDate,
    ) -> RepositoryResult<Vec<RoomAvailability>>;

    /// Hotels where exactly one room is free on `date`.
    ///
    /// Rooms and reserved rooms are counted distinctly, so a room with
    /// several overlapping reservations counts once. Hotels without rooms are
    /// never returned. Ordered by hotel ID.
    async fn get_hotels_with_one_free_room(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<HotelSummary>>;

    /// Distinct users holding a reservation active on `on` in any hotel titled
    /// `hotel_title`. Ordered by user ID.
    async fn get_users_living_in(
        &self,
        hotel_title: &str,
        on: NaiveDate,
    ) -> RepositoryResult<Vec<User>>;
}
