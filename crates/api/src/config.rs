/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public URL the server is reachable at, used in verification-email
    /// links and Stripe redirect URLs (default: `http://localhost:3000`).
    pub public_base_url: String,
    /// Session lifetime in days (default: `30`).
    pub session_ttl_days: i64,
    /// Stripe configuration; `None` when payments are not configured.
    pub stripe: Option<StripeConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`    |
    /// | `SESSION_TTL_DAYS`     | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let session_ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            session_ttl_days,
            stripe: StripeConfig::from_env(),
        }
    }
}

/// Stripe Checkout configuration.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_...`) used as the bearer token for REST calls.
    pub secret_key: String,
    /// Shared secret for verifying `Stripe-Signature` webhook headers.
    pub webhook_secret: String,
    /// Price id for a single path bundle.
    pub price_path_bundle: String,
    /// Price id for the premium membership.
    pub price_premium: String,
}

impl StripeConfig {
    /// Load Stripe configuration from environment variables.
    ///
    /// Returns `None` when `STRIPE_SECRET_KEY` is unset, signalling that
    /// payments are not configured. When the secret key is present the
    /// remaining variables are required; a partial configuration panics at
    /// startup rather than failing on the first checkout.
    ///
    /// | Variable                   | Required |
    /// |----------------------------|----------|
    /// | `STRIPE_SECRET_KEY`        | gate     |
    /// | `STRIPE_WEBHOOK_SECRET`    | yes      |
    /// | `STRIPE_PRICE_PATH_BUNDLE` | yes      |
    /// | `STRIPE_PRICE_PREMIUM`     | yes      |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY").ok()?;
        Some(Self {
            secret_key,
            webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
                .expect("STRIPE_WEBHOOK_SECRET must be set when STRIPE_SECRET_KEY is set"),
            price_path_bundle: std::env::var("STRIPE_PRICE_PATH_BUNDLE")
                .expect("STRIPE_PRICE_PATH_BUNDLE must be set when STRIPE_SECRET_KEY is set"),
            price_premium: std::env::var("STRIPE_PRICE_PREMIUM")
                .expect("STRIPE_PRICE_PREMIUM must be set when STRIPE_SECRET_KEY is set"),
        })
    }
}
