//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! solara migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/admin/migrations/` and are embedded at
//! compile time; adding a migration means adding a
//! `YYYYMMDDHHMMSS_description.sql` file there and rebuilding.

use super::CommandError;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
