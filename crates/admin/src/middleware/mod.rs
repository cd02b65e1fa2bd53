//! HTTP middleware stack for the admin API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, RequireSuperAdmin, clear_current_admin, set_current_admin};
pub use session::create_session_layer;
