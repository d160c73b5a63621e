//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, create DTOs for inserts, and any joined read shapes its queries
//! return.

pub mod module;
pub mod path;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_purchase;
pub mod resource;
pub mod session;
pub mod user;
