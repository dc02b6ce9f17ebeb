//! Storage for hotels, rooms, users and reservations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, binaries)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Logging                                              │
//! │  - "today" for residency lookups                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - InventoryRepository (CRUD)                           │
//! │  - AvailabilityRepository (availability queries)        │
//! │  - FeedbackRepository (like/dislike counters)           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────────┐   ┌─────────▼───────────────┐
//! │ Postgres Repository  │   │ Local Repository        │
//! │ (Diesel + r2d2)      │   │ (in-memory)             │
//! └──────────────────────┘   └─────────────────────────┘
//! ```
//!
//! There is no process-wide repository. Build one with [`RepositoryFactory`]
//! (or [`RepositoryBuilder`]) and pass it to the code that needs it:
//!
//! ```ignore
//! use hotel_booking::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let hotels = services::list_hotels(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    _private: (),
}

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    AvailabilityRepository, ErrorContext, FeedbackRepository, FullRepository,
    InventoryRepository, RepositoryError, RepositoryResult,
};
