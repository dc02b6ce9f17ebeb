//! High-level booking service layer.
//!
//! Repository-agnostic functions over any [`FullRepository`]. They add
//! logging and the "today" default for the residency lookup; all storage
//! semantics live in the repositories.
//!
//! # Usage
//!
//! ```no_run
//! use hotel_booking::db::{services, LocalRepository};
//! use hotel_booking::models::NewHotel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let hotel = services::create_hotel(&repo, NewHotel::titled("Maryland")).await?;
//!     services::dislike(&repo, hotel.id).await?;
//!
//!     let hotel = services::get_hotel(&repo, hotel.id).await?;
//!     println!("{} has {} dislikes", hotel.title, hotel.dislikes);
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use log::{debug, info, warn};

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{
    Hotel, HotelId, HotelSummary, NewHotel, NewReservation, NewRoom, NewUser, Reservation,
    ReservationId, Room, RoomAvailability, RoomId, User, UserId,
};

/// Local calendar date used for "currently living in" checks.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ==================== Health ====================

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Feedback ====================

/// Atomically add one dislike to a hotel.
///
/// Concurrent calls never lose an increment, and an update made to the
/// counter outside this process is never overwritten.
///
/// # Errors
/// `NotFound` when no hotel has `hotel_id`. Nothing is modified in that case.
pub async fn dislike<R: FullRepository + ?Sized>(
    repo: &R,
    hotel_id: HotelId,
) -> RepositoryResult<()> {
    match repo.dislike(hotel_id).await {
        Ok(()) => {
            info!("Hotel {} disliked", hotel_id);
            Ok(())
        }
        Err(e) => {
            if e.is_not_found() {
                warn!("Dislike for unknown hotel {}", hotel_id);
            }
            Err(e)
        }
    }
}

/// Atomically add one like to a hotel. Same guarantees as [`dislike`].
pub async fn like<R: FullRepository + ?Sized>(repo: &R, hotel_id: HotelId) -> RepositoryResult<()> {
    match repo.like(hotel_id).await {
        Ok(()) => {
            info!("Hotel {} liked", hotel_id);
            Ok(())
        }
        Err(e) => {
            if e.is_not_found() {
                warn!("Like for unknown hotel {}", hotel_id);
            }
            Err(e)
        }
    }
}

// ==================== Availability ====================

/// Every room with a `sold_out` flag for the stay `[move_in, move_out]`.
///
/// A room is sold out when any of its reservations overlaps the stay; see
/// [`StayWindow`](crate::models::StayWindow) for the exact boundary rule.
/// One row per room, ordered by room id.
pub async fn get_rooms<R: FullRepository + ?Sized>(
    repo: &R,
    move_in: NaiveDate,
    move_out: NaiveDate,
) -> RepositoryResult<Vec<RoomAvailability>> {
    let rooms = repo.get_rooms(move_in, move_out).await?;
    debug!(
        "get_rooms({}..{}): {} rooms, {} sold out",
        move_in,
        move_out,
        rooms.len(),
        rooms.iter().filter(|r| r.sold_out).count()
    );
    Ok(rooms)
}

/// Hotels with exactly one room free on `date`.
pub async fn get_hotels_with_one_free_room<R: FullRepository + ?Sized>(
    repo: &R,
    date: NaiveDate,
) -> RepositoryResult<Vec<HotelSummary>> {
    let hotels = repo.get_hotels_with_one_free_room(date).await?;
    debug!(
        "get_hotels_with_one_free_room({}): {} hotels",
        date,
        hotels.len()
    );
    Ok(hotels)
}

/// Users currently holding a reservation in a hotel titled `hotel_title`.
pub async fn get_users_living_in<R: FullRepository + ?Sized>(
    repo: &R,
    hotel_title: &str,
) -> RepositoryResult<Vec<User>> {
    get_users_living_in_on(repo, hotel_title, today()).await
}

/// [`get_users_living_in`] evaluated on an explicit date.
pub async fn get_users_living_in_on<R: FullRepository + ?Sized>(
    repo: &R,
    hotel_title: &str,
    on: NaiveDate,
) -> RepositoryResult<Vec<User>> {
    let users = repo.get_users_living_in(hotel_title, on).await?;
    debug!(
        "get_users_living_in({:?}, {}): {} users",
        hotel_title,
        on,
        users.len()
    );
    Ok(users)
}

// ==================== Hotels ====================

pub async fn create_hotel<R: FullRepository + ?Sized>(
    repo: &R,
    hotel: NewHotel,
) -> RepositoryResult<Hotel> {
    let hotel = repo.create_hotel(hotel).await?;
    info!("Created hotel {} ({:?})", hotel.id, hotel.title);
    Ok(hotel)
}

pub async fn get_hotel<R: FullRepository + ?Sized>(
    repo: &R,
    hotel_id: HotelId,
) -> RepositoryResult<Hotel> {
    repo.get_hotel(hotel_id).await
}

pub async fn list_hotels<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Hotel>> {
    let hotels = repo.list_hotels().await?;
    debug!("list_hotels: {} hotels", hotels.len());
    Ok(hotels)
}

/// Delete a hotel together with its rooms and their reservations.
pub async fn delete_hotel<R: FullRepository + ?Sized>(
    repo: &R,
    hotel_id: HotelId,
) -> RepositoryResult<()> {
    repo.delete_hotel(hotel_id).await?;
    info!("Deleted hotel {}", hotel_id);
    Ok(())
}

// ==================== Rooms ====================

pub async fn create_room<R: FullRepository + ?Sized>(
    repo: &R,
    room: NewRoom,
) -> RepositoryResult<Room> {
    let room = repo.create_room(room).await?;
    info!(
        "Created room {} ({:?}) in hotel {}",
        room.id, room.title, room.hotel_id
    );
    Ok(room)
}

pub async fn list_rooms_for_hotel<R: FullRepository + ?Sized>(
    repo: &R,
    hotel_id: HotelId,
) -> RepositoryResult<Vec<Room>> {
    repo.list_rooms_for_hotel(hotel_id).await
}

pub async fn delete_room<R: FullRepository + ?Sized>(
    repo: &R,
    room_id: RoomId,
) -> RepositoryResult<()> {
    repo.delete_room(room_id).await?;
    info!("Deleted room {}", room_id);
    Ok(())
}

// ==================== Users ====================

pub async fn create_user<R: FullRepository + ?Sized>(
    repo: &R,
    user: NewUser,
) -> RepositoryResult<User> {
    let user = repo.create_user(user).await?;
    info!("Created user {} ({:?})", user.id, user.username);
    Ok(user)
}

pub async fn delete_user<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
) -> RepositoryResult<()> {
    repo.delete_user(user_id).await?;
    info!("Deleted user {}", user_id);
    Ok(())
}

// ==================== Reservations ====================

/// Book a room. The range is half-open; `end == start` is accepted.
///
/// Overlapping reservations for the same room are not rejected.
pub async fn create_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation: NewReservation,
) -> RepositoryResult<Reservation> {
    let reservation = repo.create_reservation(reservation).await?;
    info!(
        "Created reservation {} for room {} by user {} [{}, {})",
        reservation.id,
        reservation.room_id,
        reservation.user_id,
        reservation.start,
        reservation.end
    );
    Ok(reservation)
}

pub async fn get_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation_id: ReservationId,
) -> RepositoryResult<Reservation> {
    repo.get_reservation(reservation_id).await
}

pub async fn delete_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation_id: ReservationId,
) -> RepositoryResult<()> {
    repo.delete_reservation(reservation_id).await?;
    info!("Deleted reservation {}", reservation_id);
    Ok(())
}
