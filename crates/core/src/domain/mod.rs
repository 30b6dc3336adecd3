// Domain Layer - Pure business logic and entities

pub mod assignment;
pub mod error;
pub mod ids;
pub mod product;
pub mod queue;

// Re-exports
pub use assignment::{Assignment, AssignmentKey, Resolution};
pub use error::DomainError;
pub use ids::{ConsumerId, ContainerId, ProductId, UserId};
pub use product::{CreatedProduct, ProductDraft};
pub use queue::{queue_key, PendingQueue, DEFAULT_QUEUE_TTL_MS};
