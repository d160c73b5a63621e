//! HTTP handlers, one module per resource.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod progress;
pub mod quizzes;
pub mod webhooks;
