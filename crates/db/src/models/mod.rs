//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` row struct matching the table, convertible into the
//!   `kb_core` domain type
//! - `Deserialize` create/update DTOs for the API layer

pub mod resource;
pub mod topic;
pub mod topic_history;
