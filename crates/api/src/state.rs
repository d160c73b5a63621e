use std::sync::Arc;

use crate::config::ServerConfig;
use crate::email::Mailer;
use crate::stripe::StripeClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: waymark_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Stripe Checkout client; `None` when payments are not configured.
    pub stripe: Option<Arc<StripeClient>>,
    /// SMTP mailer for verification emails; `None` when SMTP is not configured.
    pub mailer: Option<Arc<Mailer>>,
}
