//! HTTP middleware stack for the booking API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Rate limiting on auth routes (governor)

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_client, set_current_client};
pub use rate_limit::auth_rate_limiter;
pub use session::create_session_layer;
