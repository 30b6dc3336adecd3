// Application Layer - Use Cases and Business Logic

pub mod claim;
pub mod events;
pub mod maintenance;
pub mod queue_store;
pub mod shutdown;

// Re-exports
pub use claim::{ClaimService, CreateProductRequest, ResolveRequest};
pub use events::{ClaimEvent, EventBus, EventHandler, TracingEventHandler};
pub use maintenance::MaintenanceScheduler;
pub use queue_store::QueueStore;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
