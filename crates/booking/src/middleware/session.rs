//! Session middleware configuration for the booking API.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with settings
//! suited to a public surface (SameSite=Lax, 30 day inactivity expiry).

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::BookingConfig;

/// Session cookie name for the booking API.
pub const SESSION_COOKIE_NAME: &str = "solara_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Panics
///
/// Panics if the table name is invalid (should never happen with the
/// hardcoded "client_session" value).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &BookingConfig,
) -> SessionManagerLayer<PostgresStore> {
    // The session table is created via migration.
    let store = PostgresStore::new(pool.clone())
        .with_table_name("client_session")
        .expect("valid table name");

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
