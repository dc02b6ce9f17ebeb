//! Feedback repository trait: hotel like/dislike counters.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::HotelId;

/// Repository trait for hotel feedback counters.
///
/// Increments must be applied by the store against the value persisted at
/// write time (`dislikes = dislikes + 1`), never as a read-modify-write in the
/// caller, so concurrent increments from independent callers all land.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Increment the hotel's `likes` counter by one.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the hotel doesn't exist; nothing is changed
    async fn like(&self, hotel_id: HotelId) -> RepositoryResult<()>;

    /// Increment the hotel's `dislikes` counter by one.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the hotel doesn't exist; nothing is changed
    async fn dislike(&self, hotel_id: HotelId) -> RepositoryResult<()>;
}
