//! Surrogate-key allocation port.

use crate::store::domain::SurrogateId;
use crate::store::error::StoreResult;
use async_trait::async_trait;

/// Allocates surrogate keys for new records.
///
/// The store manages its own surrogate keys to avoid any ambiguity with
/// payload content. Allocation must be monotonically increasing and unique
/// across concurrent callers; gaps are tolerated, so strategies backed by a
/// database sequence, a counter table, or an in-process counter are all
/// valid and swappable without changing store logic.
#[async_trait]
pub trait SurrogateKeyIncrementer: Send + Sync {
    /// Allocates the next surrogate key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backing allocator
    /// cannot be reached.
    ///
    /// [`StoreError::Unavailable`]: crate::store::error::StoreError::Unavailable
    async fn next_id(&self) -> StoreResult<SurrogateId>;
}
