//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! ordered maps behind a single lock, which gives deterministic ID ordering
//! and makes every mutation atomic with respect to other callers.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use crate::db::repository::{
    AvailabilityRepository, ErrorContext, FeedbackRepository, InventoryRepository,
    RepositoryError, RepositoryResult,
};
use crate::models::{
    Hotel, HotelId, HotelSummary, NewHotel, NewReservation, NewRoom, NewUser, Reservation,
    ReservationId, Room, RoomAvailability, RoomId, StayWindow, User, UserId,
};

/// In-memory local repository.
///
/// Cloning is cheap and every clone shares the same underlying data, which
/// mirrors several handles onto one database.
///
/// # Example
/// ```
/// use hotel_booking::db::repositories::LocalRepository;
/// use hotel_booking::db::repository::{FeedbackRepository, InventoryRepository};
/// use hotel_booking::models::NewHotel;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// let hotel = repo.create_hotel(NewHotel::titled("Maryland")).await.unwrap();
/// repo.dislike(hotel.id).await.unwrap();
/// assert_eq!(repo.get_hotel(hotel.id).await.unwrap().dislikes, 1);
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    hotels: BTreeMap<HotelId, Hotel>,
    rooms: BTreeMap<RoomId, Room>,
    users: BTreeMap<UserId, User>,
    reservations: BTreeMap<ReservationId, Reservation>,

    // ID counters
    next_hotel_id: i64,
    next_room_id: i64,
    next_user_id: i64,
    next_reservation_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            hotels: BTreeMap::new(),
            rooms: BTreeMap::new(),
            users: BTreeMap::new(),
            reservations: BTreeMap::new(),
            next_hotel_id: 1,
            next_room_id: 1,
            next_user_id: 1,
            next_reservation_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn hotel_mut(&mut self, operation: &str, hotel_id: HotelId) -> RepositoryResult<&mut Hotel> {
        self.hotels
            .get_mut(&hotel_id)
            .ok_or_else(|| RepositoryError::missing(operation, "hotel", hotel_id))
    }

    fn remove_reservations_where(&mut self, predicate: impl Fn(&Reservation) -> bool) -> usize {
        let before = self.reservations.len();
        self.reservations.retain(|_, r| !predicate(r));
        before - self.reservations.len()
    }

    fn reserved_rooms(&self, window: StayWindow) -> HashSet<RoomId> {
        self.reservations
            .values()
            .filter(|r| window.overlaps_reservation(r))
            .map(|r| r.room_id)
            .collect()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Overwrite a hotel's dislike counter, bypassing the repository API.
    ///
    /// Simulates another writer updating the row directly. Returns `false`
    /// if the hotel doesn't exist.
    pub fn set_dislikes(&self, hotel_id: HotelId, dislikes: i64) -> bool {
        match self.data.write().hotels.get_mut(&hotel_id) {
            Some(hotel) => {
                hotel.dislikes = dislikes;
                true
            }
            None => false,
        }
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of stored reservations.
    pub fn reservation_count(&self) -> usize {
        self.data.read().reservations.len()
    }

    /// Number of stored rooms.
    pub fn room_count(&self) -> usize {
        self.data.read().rooms.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn bump_counter(
        &self,
        operation: &str,
        hotel_id: HotelId,
        counter: impl FnOnce(&mut Hotel) -> &mut i64,
    ) -> RepositoryResult<()> {
        self.check_health(operation)?;
        // The write lock is held across lookup and increment.
        let mut data = self.data.write();
        let hotel = data.hotel_mut(operation, hotel_id)?;
        let value = counter(hotel);
        // Overflow fails like a BIGINT overflow does in Postgres and leaves the counter as is.
        *value = value.checked_add(1).ok_or_else(|| {
            RepositoryError::query_with_context(
                format!("Hotel {} counter out of range", hotel_id),
                ErrorContext::new(operation)
                    .with_entity("hotel")
                    .with_entity_id(hotel_id),
            )
        })?;
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(operation: &str, entity: &str, message: String) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation).with_entity(entity),
    )
}

#[async_trait]
impl InventoryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_hotel(&self, hotel: NewHotel) -> RepositoryResult<Hotel> {
        self.check_health("create_hotel")?;
        hotel
            .validate()
            .map_err(|e| invalid("create_hotel", "hotel", e))?;

        let mut data = self.data.write();
        let id = HotelId(data.next_hotel_id);
        data.next_hotel_id += 1;

        let stored = Hotel {
            id,
            title: hotel.title,
            likes: hotel.likes,
            dislikes: hotel.dislikes,
        };
        data.hotels.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_hotel(&self, hotel_id: HotelId) -> RepositoryResult<Hotel> {
        self.check_health("get_hotel")?;
        self.data
            .read()
            .hotels
            .get(&hotel_id)
            .cloned()
            .ok_or_else(|| RepositoryError::missing("get_hotel", "hotel", hotel_id))
    }

    async fn list_hotels(&self) -> RepositoryResult<Vec<Hotel>> {
        self.check_health("list_hotels")?;
        Ok(self.data.read().hotels.values().cloned().collect())
    }

    async fn delete_hotel(&self, hotel_id: HotelId) -> RepositoryResult<()> {
        self.check_health("delete_hotel")?;
        let mut data = self.data.write();
        if data.hotels.remove(&hotel_id).is_none() {
            return Err(RepositoryError::missing("delete_hotel", "hotel", hotel_id));
        }

        let room_ids: HashSet<RoomId> = data
            .rooms
            .values()
            .filter(|room| room.hotel_id == hotel_id)
            .map(|room| room.id)
            .collect();
        data.rooms.retain(|id, _| !room_ids.contains(id));
        let removed = data.remove_reservations_where(|r| room_ids.contains(&r.room_id));

        debug!(
            "Deleted hotel {} with {} rooms and {} reservations",
            hotel_id,
            room_ids.len(),
            removed
        );
        Ok(())
    }

    async fn create_room(&self, room: NewRoom) -> RepositoryResult<Room> {
        self.check_health("create_room")?;
        room.validate()
            .map_err(|e| invalid("create_room", "room", e))?;

        let mut data = self.data.write();
        if !data.hotels.contains_key(&room.hotel_id) {
            return Err(RepositoryError::missing(
                "create_room",
                "hotel",
                room.hotel_id,
            ));
        }

        let id = RoomId(data.next_room_id);
        data.next_room_id += 1;

        let stored = Room {
            id,
            title: room.title,
            hotel_id: room.hotel_id,
        };
        data.rooms.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_rooms_for_hotel(&self, hotel_id: HotelId) -> RepositoryResult<Vec<Room>> {
        self.check_health("list_rooms_for_hotel")?;
        Ok(self
            .data
            .read()
            .rooms
            .values()
            .filter(|room| room.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn delete_room(&self, room_id: RoomId) -> RepositoryResult<()> {
        self.check_health("delete_room")?;
        let mut data = self.data.write();
        if data.rooms.remove(&room_id).is_none() {
            return Err(RepositoryError::missing("delete_room", "room", room_id));
        }
        data.remove_reservations_where(|r| r.room_id == room_id);
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        self.check_health("create_user")?;
        user.validate()
            .map_err(|e| invalid("create_user", "user", e))?;

        let mut data = self.data.write();
        if data.users.values().any(|u| u.username == user.username) {
            return Err(invalid(
                "create_user",
                "user",
                format!("username '{}' is already taken", user.username),
            ));
        }

        let id = UserId(data.next_user_id);
        data.next_user_id += 1;

        let stored = User {
            id,
            username: user.username,
        };
        data.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()> {
        self.check_health("delete_user")?;
        let mut data = self.data.write();
        if data.users.remove(&user_id).is_none() {
            return Err(RepositoryError::missing("delete_user", "user", user_id));
        }
        data.remove_reservations_where(|r| r.user_id == user_id);
        Ok(())
    }

    async fn create_reservation(
        &self,
        reservation: NewReservation,
    ) -> RepositoryResult<Reservation> {
        self.check_health("create_reservation")?;
        reservation
            .validate()
            .map_err(|e| invalid("create_reservation", "reservation", e))?;

        let mut data = self.data.write();
        if !data.rooms.contains_key(&reservation.room_id) {
            return Err(RepositoryError::missing(
                "create_reservation",
                "room",
                reservation.room_id,
            ));
        }
        if !data.users.contains_key(&reservation.user_id) {
            return Err(RepositoryError::missing(
                "create_reservation",
                "user",
                reservation.user_id,
            ));
        }

        let id = ReservationId(data.next_reservation_id);
        data.next_reservation_id += 1;

        let stored = Reservation {
            id,
            start: reservation.start,
            end: reservation.end,
            room_id: reservation.room_id,
            user_id: reservation.user_id,
        };
        data.reservations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> RepositoryResult<Reservation> {
        self.check_health("get_reservation")?;
        self.data
            .read()
            .reservations
            .get(&reservation_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::missing("get_reservation", "reservation", reservation_id)
            })
    }

    async fn delete_reservation(&self, reservation_id: ReservationId) -> RepositoryResult<()> {
        self.check_health("delete_reservation")?;
        self.data
            .write()
            .reservations
            .remove(&reservation_id)
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::missing("delete_reservation", "reservation", reservation_id)
            })
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn get_rooms(
        &self,
        move_in: NaiveDate,
        move_out: NaiveDate,
    ) -> RepositoryResult<Vec<RoomAvailability>> {
        self.check_health("get_rooms")?;
        let data = self.data.read();
        let sold_out = data.reserved_rooms(StayWindow::new(move_in, move_out));

        Ok(data
            .rooms
            .values()
            .map(|room| RoomAvailability {
                room_id: room.id,
                title: room.title.clone(),
                hotel_id: room.hotel_id,
                sold_out: sold_out.contains(&room.id),
            })
            .collect())
    }

    async fn get_hotels_with_one_free_room(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<HotelSummary>> {
        self.check_health("get_hotels_with_one_free_room")?;
        let data = self.data.read();
        let reserved = data.reserved_rooms(StayWindow::on(date));

        // hotel -> (num_of_rooms, num_of_reserved_rooms)
        let mut counts: BTreeMap<HotelId, (usize, usize)> = BTreeMap::new();
        for room in data.rooms.values() {
            let entry = counts.entry(room.hotel_id).or_default();
            entry.0 += 1;
            if reserved.contains(&room.id) {
                entry.1 += 1;
            }
        }

        Ok(counts
            .into_iter()
            .filter(|(_, (rooms, reserved))| rooms - reserved == 1)
            .filter_map(|(hotel_id, _)| data.hotels.get(&hotel_id))
            .map(HotelSummary::from)
            .collect())
    }

    async fn get_users_living_in(
        &self,
        hotel_title: &str,
        on: NaiveDate,
    ) -> RepositoryResult<Vec<User>> {
        self.check_health("get_users_living_in")?;
        let data = self.data.read();
        let window = StayWindow::on(on);

        let hotel_ids: HashSet<HotelId> = data
            .hotels
            .values()
            .filter(|h| h.title == hotel_title)
            .map(|h| h.id)
            .collect();
        let room_ids: HashSet<RoomId> = data
            .rooms
            .values()
            .filter(|room| hotel_ids.contains(&room.hotel_id))
            .map(|room| room.id)
            .collect();
        let user_ids: BTreeSet<UserId> = data
            .reservations
            .values()
            .filter(|r| room_ids.contains(&r.room_id) && window.overlaps_reservation(r))
            .map(|r| r.user_id)
            .collect();

        Ok(user_ids
            .iter()
            .filter_map(|id| data.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl FeedbackRepository for LocalRepository {
    async fn like(&self, hotel_id: HotelId) -> RepositoryResult<()> {
        self.bump_counter("like", hotel_id, |hotel| &mut hotel.likes)
    }

    async fn dislike(&self, hotel_id: HotelId) -> RepositoryResult<()> {
        self.bump_counter("dislike", hotel_id, |hotel| &mut hotel.dislikes)
    }
}
