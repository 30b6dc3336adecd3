// Port Layer - Interfaces for external dependencies

pub mod access_gate;
pub mod assignment_repository;
pub mod product_creator;
pub mod time_provider;
pub mod transient_store;

// Re-exports
pub use access_gate::{AccessGate, SharedSecretGate};
pub use assignment_repository::AssignmentRepository;
pub use product_creator::ProductCreator;
pub use time_provider::{ManualTimeProvider, SystemTimeProvider, TimeProvider};
pub use transient_store::{Rewrite, Transient, TransientStore};
