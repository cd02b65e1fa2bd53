//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Auth error: {0}")]
    Auth(#[from] solara_admin::services::auth::AuthError),
}

/// Connect to the database named by `DATABASE_URL`.
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))?;

    Ok(PgPool::connect(&database_url).await?)
}
