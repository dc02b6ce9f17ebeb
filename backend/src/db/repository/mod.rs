//! Repository trait definitions for database operations.
//!
//! Responsibilities are split across focused traits so that each backend
//! implementation stays readable and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`inventory`]: CRUD for hotels, rooms, users and reservations
//! - [`availability`]: Read-only availability and residency queries
//! - [`feedback`]: Atomic like/dislike counters
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn seed<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let hotel = repo.create_hotel(NewHotel::titled("Maryland")).await?;
//!     repo.dislike(hotel.id).await?;
//!     Ok(())
//! }
//! ```

pub mod availability;
pub mod error;
pub mod feedback;
pub mod inventory;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use availability::AvailabilityRepository;
pub use feedback::FeedbackRepository;
pub use inventory::InventoryRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all three
/// repository traits.
pub trait FullRepository: InventoryRepository + AvailabilityRepository + FeedbackRepository {}

impl<T> FullRepository for T where T: InventoryRepository + AvailabilityRepository + FeedbackRepository
{}
