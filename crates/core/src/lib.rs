//! Domain logic for the Waymark learning platform.
//!
//! Pure computation only: progress math, quiz grading, entitlement rules,
//! payment event handling, and token/signature utilities. The crate has no
//! database or HTTP dependencies; callers pre-load whatever data a function
//! needs and pass it in.

pub mod accounts;
pub mod entitlement;
pub mod error;
pub mod grading;
pub mod payments;
pub mod progress;
pub mod signature;
pub mod tokens;
pub mod types;

pub use error::CoreError;
pub use types::{DbId, Timestamp};
