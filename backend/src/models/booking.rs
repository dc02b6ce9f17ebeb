//! Booking entities: hotels, rooms, reservations and the users holding them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::define_id_type;

/// Maximum length of hotel and room titles.
pub const MAX_TITLE_LEN: usize = 128;

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 150;

define_id_type!(HotelId);
define_id_type!(RoomId);
define_id_type!(ReservationId);
define_id_type!(UserId);

/// A hotel with its feedback counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub title: String,
    pub likes: i64,
    pub dislikes: i64,
}

/// A room belonging to exactly one hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    pub hotel_id: HotelId,
}

/// A reservation of a room by a user over the half-open range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// Minimal user record. Identity is owned elsewhere; only the id and a
/// display name are kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Room row annotated with availability for a stay window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAvailability {
    pub room_id: RoomId,
    pub title: String,
    pub hotel_id: HotelId,
    pub sold_out: bool,
}

/// Lightweight hotel listing used by aggregate queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelSummary {
    pub hotel_id: HotelId,
    pub title: String,
}

impl From<&Hotel> for HotelSummary {
    fn from(hotel: &Hotel) -> Self {
        Self {
            hotel_id: hotel.id,
            title: hotel.title.clone(),
        }
    }
}

/// Insert payload for [`Hotel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHotel {
    pub title: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
}

impl NewHotel {
    /// A hotel with zeroed counters.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            likes: 0,
            dislikes: 0,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_title("hotel", &self.title)?;
        if self.likes < 0 || self.dislikes < 0 {
            return Err(format!(
                "hotel counters must be non-negative (likes={}, dislikes={})",
                self.likes, self.dislikes
            ));
        }
        Ok(())
    }
}

/// Insert payload for [`Room`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    pub title: String,
    pub hotel_id: HotelId,
}

impl NewRoom {
    pub fn new(hotel_id: HotelId, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hotel_id,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_title("room", &self.title)
    }
}

/// Insert payload for [`Reservation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub room_id: RoomId,
    pub user_id: UserId,
}

impl NewReservation {
    /// Rejects inverted ranges. An empty range (`start == end`) is allowed.
    pub fn validate(&self) -> Result<(), String> {
        if self.end < self.start {
            return Err(format!(
                "reservation end {} is before start {}",
                self.end, self.start
            ));
        }
        Ok(())
    }
}

/// Insert payload for [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.username.chars().count() > MAX_USERNAME_LEN {
            return Err(format!(
                "username exceeds {} characters",
                MAX_USERNAME_LEN
            ));
        }
        Ok(())
    }
}

fn validate_title(entity: &str, title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err(format!("{} title must not be empty", entity));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "{} title exceeds {} characters",
            entity, MAX_TITLE_LEN
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_id_roundtrip_and_display() {
        let id = HotelId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(RoomId::from(7), RoomId(7));
        assert_eq!(format!("{}", UserId(3)), "3");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&ReservationId(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn test_new_hotel_validation() {
        assert!(NewHotel::titled("Maryland").validate().is_ok());
        assert!(NewHotel::titled("   ").validate().is_err());
        assert!(NewHotel::titled("x".repeat(MAX_TITLE_LEN + 1))
            .validate()
            .is_err());

        let negative = NewHotel {
            title: "Hampton".to_string(),
            likes: 0,
            dislikes: -1,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_new_hotel_counters_default_to_zero() {
        let hotel: NewHotel = serde_json::from_str(r#"{"title": "Maryland"}"#).unwrap();
        assert_eq!(hotel.likes, 0);
        assert_eq!(hotel.dislikes, 0);
    }

    #[test]
    fn test_new_reservation_rejects_inverted_range() {
        let ok = NewReservation {
            start: date(2021, 6, 15),
            end: date(2021, 6, 16),
            room_id: RoomId(1),
            user_id: UserId(1),
        };
        assert!(ok.validate().is_ok());

        let empty = NewReservation {
            end: date(2021, 6, 15),
            ..ok.clone()
        };
        assert!(empty.validate().is_ok());

        let inverted = NewReservation {
            end: date(2021, 6, 14),
            ..ok
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_new_user_validation() {
        assert!(NewUser::new("User 1").validate().is_ok());
        assert!(NewUser::new("").validate().is_err());
        assert!(NewUser::new("u".repeat(MAX_USERNAME_LEN + 1))
            .validate()
            .is_err());
    }

    #[test]
    fn test_hotel_summary_from_hotel() {
        let hotel = Hotel {
            id: HotelId(5),
            title: "Maryland".to_string(),
            likes: 1,
            dislikes: 2,
        };
        let summary = HotelSummary::from(&hotel);
        assert_eq!(summary.hotel_id, HotelId(5));
        assert_eq!(summary.title, "Maryland");
    }
}
