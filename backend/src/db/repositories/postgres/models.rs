use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Text};

use super::schema::{hotels, reservations, rooms, users};
use crate::models::{
    Hotel, HotelId, HotelSummary, Reservation, ReservationId, Room, RoomAvailability, RoomId,
    User, UserId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HotelRow {
    pub id: i64,
    pub title: String,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hotels)]
pub struct NewHotelRow {
    pub title: String,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoomRow {
    pub id: i64,
    pub title: String,
    pub hotel_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub struct NewRoomRow {
    pub title: String,
    pub hotel_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub username: String,
}

/// Row shape of the annotated room availability query.
#[derive(Debug, Clone, QueryableByName)]
pub struct RoomAvailabilityRow {
    #[diesel(sql_type = BigInt)]
    pub room_id: i64,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = BigInt)]
    pub hotel_id: i64,
    #[diesel(sql_type = Bool)]
    pub sold_out: bool,
}

/// Row shape of hotel aggregate queries.
#[derive(Debug, Clone, QueryableByName)]
pub struct HotelSummaryRow {
    #[diesel(sql_type = BigInt)]
    pub hotel_id: i64,
    #[diesel(sql_type = Text)]
    pub title: String,
}

impl From<HotelRow> for Hotel {
    fn from(row: HotelRow) -> Self {
        Self {
            id: HotelId(row.id),
            title: row.title,
            likes: row.likes,
            dislikes: row.dislikes,
        }
    }
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: RoomId(row.id),
            title: row.title,
            hotel_id: HotelId(row.hotel_id),
        }
    }
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: ReservationId(row.id),
            start: row.start_date,
            end: row.end_date,
            room_id: RoomId(row.room_id),
            user_id: UserId(row.user_id),
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            username: row.username,
        }
    }
}

impl From<RoomAvailabilityRow> for RoomAvailability {
    fn from(row: RoomAvailabilityRow) -> Self {
        Self {
            room_id: RoomId(row.room_id),
            title: row.title,
            hotel_id: HotelId(row.hotel_id),
            sold_out: row.sold_out,
        }
    }
}

impl From<HotelSummaryRow> for HotelSummary {
    fn from(row: HotelSummaryRow) -> Self {
        Self {
            hotel_id: HotelId(row.hotel_id),
            title: row.title,
        }
    }
}
