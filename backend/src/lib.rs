//! # Hotel Booking Backend
//!
//! Hotels, rooms, users and reservations, with availability queries and
//! atomic like/dislike counters.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types and the stay overlap rule
//! - [`api`]: Types shared with API consumers
//! - [`db`]: Repository traits, the Postgres and in-memory backends, and the service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Quick start
//!
//! ```
//! use hotel_booking::db::{services, LocalRepository};
//! use hotel_booking::models::{NewHotel, NewRoom};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = LocalRepository::new();
//! let hotel = services::create_hotel(&repo, NewHotel::titled("Maryland")).await?;
//! services::create_room(&repo, NewRoom::new(hotel.id, "Room 1")).await?;
//!
//! let date = chrono::NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
//! let free = services::get_hotels_with_one_free_room(&repo, date).await?;
//! assert_eq!(free.len(), 1);
//! # Ok(())
//! # }
//! ```

// RepositoryError carries an ErrorContext in every variant.
#![allow(clippy::result_large_err)]

pub mod api;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
