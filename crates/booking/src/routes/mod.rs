//! HTTP route handlers for the booking API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the database)
//!
//! # Catalog (public)
//! GET  /api/services               - Active services (?category= filter)
//! GET  /api/services/{id}          - Service detail
//! GET  /api/products               - Active products
//! GET  /api/promotions             - Promotions in effect today
//! GET  /api/professionals          - Active professionals (public subset)
//!
//! # Auth (rate limited)
//! POST /api/auth/register          - Client sign-up
//! POST /api/auth/login             - Login
//! POST /api/auth/logout            - Logout
//! GET  /api/auth/me                - Current client
//!
//! # Account (requires auth)
//! GET  /api/account/profile        - Profile and onboarding flags
//! PUT  /api/account/profile        - Update contact info / onboarding
//!
//! # Scheduling
//! GET  /api/availability           - Open slots for professional+service+date
//! POST /api/appointments           - Book (requires auth)
//! GET  /api/appointments           - Own appointments (requires auth)
//! POST /api/appointments/{id}/cancel - Cancel own appointment
//! ```

pub mod account;
pub mod appointments;
pub mod auth;
pub mod availability;
pub mod catalog;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(middleware::auth_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(account::profile).put(account::update_profile),
    )
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(catalog::list_services))
        .route("/services/{id}", get(catalog::show_service))
        .route("/products", get(catalog::list_products))
        .route("/promotions", get(catalog::list_promotions))
        .route("/professionals", get(catalog::list_professionals))
}

/// Create the appointment routes router.
pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(appointments::create).get(appointments::list))
        .route("/{id}/cancel", post(appointments::cancel))
}

/// Create all routes for the booking API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/account", account_routes())
        .nest("/api/appointments", appointment_routes())
        .route("/api/availability", get(availability::show))
        .nest("/api", catalog_routes())
}
