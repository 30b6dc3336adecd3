// Claimq Infrastructure - SQLite Adapter
// Implements: TransientStore, AssignmentRepository

mod assignment_repository;
mod connection;
mod error;
mod migration;
mod transient_store;

pub use assignment_repository::SqliteAssignmentRepository;
pub use connection::create_pool;
pub use migration::run_migrations;
pub use transient_store::SqliteTransientStore;
