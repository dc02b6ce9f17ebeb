//! Inventory repository trait: direct CRUD over the booking entities.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    Hotel, HotelId, NewHotel, NewReservation, NewRoom, NewUser, Reservation, ReservationId, Room,
    RoomId, User, UserId,
};

/// Repository trait for creating, reading and deleting hotels, rooms,
/// users and reservations.
///
/// Deletes cascade downward: removing a hotel removes its rooms, removing a
/// room or a user removes the reservations that reference it.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Hotels ====================

    /// Insert a hotel.
    ///
    /// # Returns
    /// * `Ok(Hotel)` - The stored hotel with its assigned ID
    /// * `Err(RepositoryError::ValidationError)` - Empty title or negative counters
    async fn create_hotel(&self, hotel: NewHotel) -> RepositoryResult<Hotel>;

    /// Fetch a hotel by ID.
    ///
    /// # Returns
    /// * `Ok(Hotel)` - The hotel as currently persisted
    /// * `Err(RepositoryError::NotFound)` - If the hotel doesn't exist
    async fn get_hotel(&self, hotel_id: HotelId) -> RepositoryResult<Hotel>;

    /// List all hotels ordered by ID.
    async fn list_hotels(&self) -> RepositoryResult<Vec<Hotel>>;

    /// Delete a hotel together with its rooms and their reservations.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the hotel doesn't exist
    async fn delete_hotel(&self, hotel_id: HotelId) -> RepositoryResult<()>;

    // ==================== Rooms ====================

    /// Insert a room into an existing hotel.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the hotel doesn't exist
    async fn create_room(&self, room: NewRoom) -> RepositoryResult<Room>;

    /// List the rooms of a hotel ordered by ID. Unknown hotels yield an empty list.
    async fn list_rooms_for_hotel(&self, hotel_id: HotelId) -> RepositoryResult<Vec<Room>>;

    /// Delete a room together with its reservations.
    async fn delete_room(&self, room_id: RoomId) -> RepositoryResult<()>;

    // ==================== Users ====================

    /// Insert a user.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` - Empty or duplicate username
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;

    /// Delete a user together with their reservations.
    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()>;

    // ==================== Reservations ====================

    /// Insert a reservation for an existing room and user.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the room or the user doesn't exist
    /// * `Err(RepositoryError::ValidationError)` - If `end < start`
    async fn create_reservation(&self, reservation: NewReservation)
        -> RepositoryResult<Reservation>;

    /// Fetch a reservation by ID.
    async fn get_reservation(&self, reservation_id: ReservationId)
        -> RepositoryResult<Reservation>;

    /// Delete a single reservation.
    async fn delete_reservation(&self, reservation_id: ReservationId) -> RepositoryResult<()>;
}
