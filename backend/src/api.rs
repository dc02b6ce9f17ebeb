//! Public API surface for the booking backend.
//!
//! Consolidates the domain types used by the HTTP layer and by library
//! consumers. All types derive Serialize/Deserialize.

pub use crate::models::{
    Hotel, HotelId, HotelSummary, NewHotel, NewReservation, NewRoom, NewUser, Reservation,
    ReservationId, Room, RoomAvailability, RoomId, StayWindow, User, UserId,
};
