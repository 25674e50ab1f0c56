//! Domain core for the knowledge-base service.
//!
//! Holds the topic aggregate, the hierarchy algorithms (tree building, path
//! search, reparent checks), version resolution and the deletion guard. None
//! of it knows about Postgres: persistence is reached through the
//! [`store::TopicStore`] and [`store::ResourceCleaner`] seams.

pub mod ancestry;
pub mod deletion;
pub mod error;
pub mod pagination;
pub mod path;
pub mod store;
pub mod topic;
pub mod tree;
pub mod types;
pub mod versioning;

#[cfg(test)]
pub(crate) mod test_support;
