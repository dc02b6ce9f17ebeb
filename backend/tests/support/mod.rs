#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use hotel_booking::db::FullRepository;
use hotel_booking::models::{
    Hotel, NewHotel, NewReservation, NewRoom, NewUser, Reservation, Room, User,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on drop (including unwinding) and holds a
/// global lock so parallel tests never observe each other's changes.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Fixtures ====================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn hotel<R: FullRepository + ?Sized>(repo: &R, title: &str) -> Hotel {
    repo.create_hotel(NewHotel::titled(title))
        .await
        .expect("create hotel")
}

pub async fn room<R: FullRepository + ?Sized>(repo: &R, hotel: &Hotel, title: &str) -> Room {
    repo.create_room(NewRoom::new(hotel.id, title))
        .await
        .expect("create room")
}

pub async fn user<R: FullRepository + ?Sized>(repo: &R, username: &str) -> User {
    repo.create_user(NewUser::new(username))
        .await
        .expect("create user")
}

pub async fn reserve<R: FullRepository + ?Sized>(
    repo: &R,
    room: &Room,
    user: &User,
    start: NaiveDate,
    end: NaiveDate,
) -> Reservation {
    repo.create_reservation(NewReservation {
        start,
        end,
        room_id: room.id,
        user_id: user.id,
    })
    .await
    .expect("create reservation")
}
