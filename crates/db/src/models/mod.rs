//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs for inserts
//! - Safe response types for external-facing output where the row itself
//!   carries fields the API must not leak

pub mod generation;
pub mod profile;
pub mod template;
