//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
//!
//! ## Query semantics
//!
//! Availability queries are plain SQL so the overlap predicate reads exactly
//! like [`StayWindow::overlaps`](crate::models::StayWindow::overlaps):
//! `NOT (end_date <= move_in OR start_date > move_out)`. Counter updates are a
//! single `UPDATE ... SET col = col + 1` evaluated by the server.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Date;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::repository::{
    AvailabilityRepository, ErrorContext, FeedbackRepository, InventoryRepository,
    RepositoryError, RepositoryResult,
};
use crate::models::{
    Hotel, HotelId, HotelSummary, NewHotel, NewReservation, NewRoom, NewUser, Reservation,
    ReservationId, Room, RoomAvailability, RoomId, User, UserId,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// One row per room; a room is sold out when any reservation overlaps `[$1, $2]`.
const ROOM_AVAILABILITY_SQL: &str = r#"
SELECT r.id AS room_id,
       r.title AS title,
       r.hotel_id AS hotel_id,
       COUNT(res.id) FILTER (
           WHERE NOT (res.end_date <= $1 OR res.start_date > $2)
       ) >= 1 AS sold_out
FROM rooms r
LEFT JOIN reservations res ON res.room_id = r.id
GROUP BY r.id, r.title, r.hotel_id
ORDER BY r.id
"#;

/// Hotels whose distinct room count minus distinct rooms reserved at `$1` is one.
const ONE_FREE_ROOM_SQL: &str = r#"
SELECT h.id AS hotel_id,
       h.title AS title
FROM hotels h
JOIN rooms r ON r.hotel_id = h.id
LEFT JOIN reservations res
       ON res.room_id = r.id
      AND NOT (res.end_date <= $1 OR res.start_date > $1)
GROUP BY h.id, h.title
HAVING COUNT(DISTINCT r.id) - COUNT(DISTINCT res.room_id) = 1
ORDER BY h.id
"#;

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read and their defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;
        info!(
            "Postgres pool ready (max_size={}, min_idle={})",
            config.max_pool_size, config.min_pool_size
        );

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        if !applied.is_empty() {
            info!("Applied {} pending migrations", applied.len());
        }
        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times with exponential backoff when a
    /// retryable error occurs (connection errors, timeouts, serialization
    /// failures). Failed statements are never committed, so retrying a single
    /// `UPDATE` cannot apply it twice.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        let result = self.health_check().await;
        let latency = Some(start.elapsed().as_millis() as u64);
        match result {
            Ok(true) => (true, latency, None),
            Ok(false) => (
                false,
                latency,
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (false, latency, Some(e.to_string())),
        }
    }

    async fn bump_counter(
        &self,
        operation: &'static str,
        hotel_id: HotelId,
        dislike: bool,
    ) -> RepositoryResult<()> {
        let updated = self
            .with_conn(move |conn| {
                let target = hotels::table.find(hotel_id.value());
                let result = if dislike {
                    diesel::update(target)
                        .set(hotels::dislikes.eq(hotels::dislikes + 1))
                        .execute(conn)
                } else {
                    diesel::update(target)
                        .set(hotels::likes.eq(hotels::likes + 1))
                        .execute(conn)
                };
                result.map_err(db_err(operation))
            })
            .await?;

        if updated == 0 {
            return Err(RepositoryError::missing(operation, "hotel", hotel_id));
        }
        Ok(())
    }
}

fn db_err(operation: &'static str) -> impl Fn(diesel::result::Error) -> RepositoryError {
    move |e| RepositoryError::from(e).with_operation(operation)
}

fn invalid(operation: &str, entity: &str, message: String) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation).with_entity(entity),
    )
}

/// Map a zero-row delete to `NotFound`.
fn expect_deleted(deleted: usize, operation: &str, entity: &str, id: i64) -> RepositoryResult<()> {
    if deleted == 0 {
        Err(RepositoryError::missing(operation, entity, id))
    } else {
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(db_err("health_check"))
        })
        .await
    }

    async fn create_hotel(&self, hotel: NewHotel) -> RepositoryResult<Hotel> {
        hotel
            .validate()
            .map_err(|e| invalid("create_hotel", "hotel", e))?;

        self.with_conn(move |conn| {
            let row = NewHotelRow {
                title: hotel.title,
                likes: hotel.likes,
                dislikes: hotel.dislikes,
            };
            diesel::insert_into(hotels::table)
                .values(&row)
                .returning(HotelRow::as_returning())
                .get_result::<HotelRow>(conn)
                .map(Hotel::from)
                .map_err(db_err("create_hotel"))
        })
        .await
    }

    async fn get_hotel(&self, hotel_id: HotelId) -> RepositoryResult<Hotel> {
        self.with_conn(move |conn| {
            hotels::table
                .find(hotel_id.value())
                .select(HotelRow::as_select())
                .first::<HotelRow>(conn)
                .optional()
                .map_err(db_err("get_hotel"))?
                .map(Hotel::from)
                .ok_or_else(|| RepositoryError::missing("get_hotel", "hotel", hotel_id))
        })
        .await
    }

    async fn list_hotels(&self) -> RepositoryResult<Vec<Hotel>> {
        self.with_conn(|conn| {
            let rows = hotels::table
                .select(HotelRow::as_select())
                .order(hotels::id.asc())
                .load::<HotelRow>(conn)
                .map_err(db_err("list_hotels"))?;
            Ok(rows.into_iter().map(Hotel::from).collect())
        })
        .await
    }

    async fn delete_hotel(&self, hotel_id: HotelId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            // Rooms and reservations go with it via ON DELETE CASCADE.
            let deleted = diesel::delete(hotels::table.find(hotel_id.value()))
                .execute(conn)
                .map_err(db_err("delete_hotel"))?;
            expect_deleted(deleted, "delete_hotel", "hotel", hotel_id.value())
        })
        .await
    }

    async fn create_room(&self, room: NewRoom) -> RepositoryResult<Room> {
        room.validate()
            .map_err(|e| invalid("create_room", "room", e))?;

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let hotel_exists: bool = diesel::select(diesel::dsl::exists(
                    hotels::table.find(room.hotel_id.value()),
                ))
                .get_result(tx)
                .map_err(db_err("create_room"))?;
                if !hotel_exists {
                    return Err(RepositoryError::missing(
                        "create_room",
                        "hotel",
                        room.hotel_id,
                    ));
                }

                let row = NewRoomRow {
                    title: room.title.clone(),
                    hotel_id: room.hotel_id.value(),
                };
                diesel::insert_into(rooms::table)
                    .values(&row)
                    .returning(RoomRow::as_returning())
                    .get_result::<RoomRow>(tx)
                    .map(Room::from)
                    .map_err(db_err("create_room"))
            })
        })
        .await
    }

    async fn list_rooms_for_hotel(&self, hotel_id: HotelId) -> RepositoryResult<Vec<Room>> {
        self.with_conn(move |conn| {
            let rows = rooms::table
                .filter(rooms::hotel_id.eq(hotel_id.value()))
                .select(RoomRow::as_select())
                .order(rooms::id.asc())
                .load::<RoomRow>(conn)
                .map_err(db_err("list_rooms_for_hotel"))?;
            Ok(rows.into_iter().map(Room::from).collect())
        })
        .await
    }

    async fn delete_room(&self, room_id: RoomId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(rooms::table.find(room_id.value()))
                .execute(conn)
                .map_err(db_err("delete_room"))?;
            expect_deleted(deleted, "delete_room", "room", room_id.value())
        })
        .await
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        user.validate()
            .map_err(|e| invalid("create_user", "user", e))?;

        self.with_conn(move |conn| {
            let row = NewUserRow {
                username: user.username,
            };
            // Duplicate usernames surface as UniqueViolation -> ValidationError.
            diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)
                .map(User::from)
                .map_err(db_err("create_user"))
        })
        .await
    }

    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(users::table.find(user_id.value()))
                .execute(conn)
                .map_err(db_err("delete_user"))?;
            expect_deleted(deleted, "delete_user", "user", user_id.value())
        })
        .await
    }

    async fn create_reservation(
        &self,
        reservation: NewReservation,
    ) -> RepositoryResult<Reservation> {
        reservation
            .validate()
            .map_err(|e| invalid("create_reservation", "reservation", e))?;

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let room_exists: bool = diesel::select(diesel::dsl::exists(
                    rooms::table.find(reservation.room_id.value()),
                ))
                .get_result(tx)
                .map_err(db_err("create_reservation"))?;
                if !room_exists {
                    return Err(RepositoryError::missing(
                        "create_reservation",
                        "room",
                        reservation.room_id,
                    ));
                }

                let user_exists: bool = diesel::select(diesel::dsl::exists(
                    users::table.find(reservation.user_id.value()),
                ))
                .get_result(tx)
                .map_err(db_err("create_reservation"))?;
                if !user_exists {
                    return Err(RepositoryError::missing(
                        "create_reservation",
                        "user",
                        reservation.user_id,
                    ));
                }

                let row = NewReservationRow {
                    start_date: reservation.start,
                    end_date: reservation.end,
                    room_id: reservation.room_id.value(),
                    user_id: reservation.user_id.value(),
                };
                diesel::insert_into(reservations::table)
                    .values(&row)
                    .returning(ReservationRow::as_returning())
                    .get_result::<ReservationRow>(tx)
                    .map(Reservation::from)
                    .map_err(db_err("create_reservation"))
            })
        })
        .await
    }

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> RepositoryResult<Reservation> {
        self.with_conn(move |conn| {
            reservations::table
                .find(reservation_id.value())
                .select(ReservationRow::as_select())
                .first::<ReservationRow>(conn)
                .optional()
                .map_err(db_err("get_reservation"))?
                .map(Reservation::from)
                .ok_or_else(|| {
                    RepositoryError::missing("get_reservation", "reservation", reservation_id)
                })
        })
        .await
    }

    async fn delete_reservation(&self, reservation_id: ReservationId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(reservations::table.find(reservation_id.value()))
                .execute(conn)
                .map_err(db_err("delete_reservation"))?;
            expect_deleted(
                deleted,
                "delete_reservation",
                "reservation",
                reservation_id.value(),
            )
        })
        .await
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresRepository {
    async fn get_rooms(
        &self,
        move_in: NaiveDate,
        move_out: NaiveDate,
    ) -> RepositoryResult<Vec<RoomAvailability>> {
        self.with_conn(move |conn| {
            let rows = sql_query(ROOM_AVAILABILITY_SQL)
                .bind::<Date, _>(move_in)
                .bind::<Date, _>(move_out)
                .load::<RoomAvailabilityRow>(conn)
                .map_err(db_err("get_rooms"))?;
            Ok(rows.into_iter().map(RoomAvailability::from).collect())
        })
        .await
    }

    async fn get_hotels_with_one_free_room(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<HotelSummary>> {
        self.with_conn(move |conn| {
            let rows = sql_query(ONE_FREE_ROOM_SQL)
                .bind::<Date, _>(date)
                .load::<HotelSummaryRow>(conn)
                .map_err(db_err("get_hotels_with_one_free_room"))?;
            Ok(rows.into_iter().map(HotelSummary::from).collect())
        })
        .await
    }

    async fn get_users_living_in(
        &self,
        hotel_title: &str,
        on: NaiveDate,
    ) -> RepositoryResult<Vec<User>> {
        let hotel_title = hotel_title.to_string();
        self.with_conn(move |conn| {
            // NOT (end <= on OR start > on)  <=>  end > on AND start <= on
            let rows = users::table
                .inner_join(
                    reservations::table.inner_join(rooms::table.inner_join(hotels::table)),
                )
                .filter(hotels::title.eq(hotel_title.as_str()))
                .filter(reservations::end_date.gt(on))
                .filter(reservations::start_date.le(on))
                .select(UserRow::as_select())
                .distinct()
                .order(users::id.asc())
                .load::<UserRow>(conn)
                .map_err(db_err("get_users_living_in"))?;
            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }
}

#[async_trait]
impl FeedbackRepository for PostgresRepository {
    async fn like(&self, hotel_id: HotelId) -> RepositoryResult<()> {
        self.bump_counter("like", hotel_id, false).await
    }

    async fn dislike(&self, hotel_id: HotelId) -> RepositoryResult<()> {
        self.bump_counter("dislike", hotel_id, true).await
    }
}
