//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Reads accept `&PgPool`; writes that may run inside a transaction accept
//! any `PgExecutor` so callers can pass either the pool or `&mut *tx`.

pub mod resource_repo;
pub mod topic_history_repo;
pub mod topic_repo;

pub use resource_repo::ResourceRepo;
pub use topic_history_repo::TopicHistoryRepo;
pub use topic_repo::TopicRepo;
