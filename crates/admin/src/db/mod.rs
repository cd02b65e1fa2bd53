//! Database operations for the admin API.
//!
//! # Tables (shared salon database)
//!
//! - `admin_user` / `admin_session` - Admin authentication
//! - `client` / `client_note` - Clients, credit, notes
//! - `professional` / `working_hours` / `blocked_hours` - Staff and schedule
//! - `service` / `product` / `promotion` - Catalog
//! - `appointment` - Bookings (shared with the booking binary)
//! - `comanda` / `comanda_item` - Service tickets
//! - `cash_register` / `cash_movement` - Drawer shifts
//! - `expense` - Despesas
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p solara-cli -- migrate
//! ```

pub mod admin_users;
pub mod appointments;
pub mod cashier;
pub mod clients;
pub mod comandas;
pub mod expenses;
pub mod products;
pub mod professionals;
pub mod promotions;
pub mod reports;
pub mod services;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use appointments::AppointmentRepository;
pub use cashier::CashierRepository;
pub use clients::ClientRepository;
pub use comandas::{ComandaRepository, NewComandaItem};
pub use expenses::ExpenseRepository;
pub use products::ProductRepository;
pub use professionals::{ProfessionalRepository, Removal};
pub use promotions::PromotionRepository;
pub use reports::ReportRepository;
pub use services::ServiceRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, second open register).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Operation is semantically invalid in the current state
    /// (insufficient stock, closed comanda, no open register).
    #[error("invalid operation: {0}")]
    Invalid(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
