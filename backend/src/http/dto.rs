//! Data Transfer Objects for the HTTP API.
//!
//! Entity bodies (`Hotel`, `NewHotel`, `Reservation`, ...) are the domain
//! types themselves; this module only adds envelopes and query strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{Hotel, HotelSummary, Room, RoomAvailability, User};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Request body for `POST /v1/hotels/{id}/rooms`. The hotel comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub title: String,
}

/// `?move_in=YYYY-MM-DD&move_out=YYYY-MM-DD`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StayQuery {
    pub move_in: NaiveDate,
    pub move_out: NaiveDate,
}

/// `?date=YYYY-MM-DD`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// `?title=...[&date=YYYY-MM-DD]`. Without `date` the server's local date is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidentsQuery {
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Hotel list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelListResponse {
    pub hotels: Vec<Hotel>,
    pub total: usize,
}

impl From<Vec<Hotel>> for HotelListResponse {
    fn from(hotels: Vec<Hotel>) -> Self {
        Self {
            total: hotels.len(),
            hotels,
        }
    }
}

/// Rooms of one hotel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<Room>,
    pub total: usize,
}

impl From<Vec<Room>> for RoomListResponse {
    fn from(rooms: Vec<Room>) -> Self {
        Self {
            total: rooms.len(),
            rooms,
        }
    }
}

/// Annotated rooms for a stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomAvailabilityResponse {
    pub move_in: NaiveDate,
    pub move_out: NaiveDate,
    pub rooms: Vec<RoomAvailability>,
}

/// Hotels with exactly one free room on `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeRoomHotelsResponse {
    pub date: NaiveDate,
    pub hotels: Vec<HotelSummary>,
}

/// Users living in a hotel on `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidentsResponse {
    pub title: String,
    pub date: NaiveDate,
    pub users: Vec<User>,
}
