// Assignment Repository Port (Interface)

use crate::domain::{Assignment, AssignmentKey};
use crate::error::Result;
use async_trait::async_trait;

/// Durable per-container storage of write-once assignments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Find the assignment for a (container, consumer) pair
    async fn find(&self, key: &AssignmentKey) -> Result<Option<Assignment>>;

    /// Persist an assignment unless one already exists for its key.
    ///
    /// Returns false (and writes nothing) if the pair was already assigned.
    async fn insert_if_absent(&self, assignment: &Assignment) -> Result<bool>;

    /// Total number of stored assignments
    async fn count(&self) -> Result<i64>;
}
