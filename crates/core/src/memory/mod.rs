// In-memory adapters (tests and ephemeral daemon runs)

mod assignment_repository;
mod transient_store;

pub use assignment_repository::MemoryAssignmentRepository;
pub use transient_store::MemoryTransientStore;
