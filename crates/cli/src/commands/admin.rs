//! Admin user management commands.

use solara_admin::services::auth::AuthService;
use solara_core::AdminRole;

use super::CommandError;

/// Create an admin user.
///
/// The password comes from the `--password` flag or the
/// `SOLARA_ADMIN_PASSWORD` environment variable, so it never has to appear
/// in shell history.
///
/// # Errors
///
/// Returns `CommandError` for an invalid role, a missing password, or a
/// failed insert (duplicate email, weak password).
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: Option<&str>,
) -> Result<(), CommandError> {
    let role: AdminRole = role
        .parse()
        .map_err(CommandError::InvalidArgument)?;

    let password = match password {
        Some(p) => p.to_owned(),
        None => std::env::var("SOLARA_ADMIN_PASSWORD")
            .map_err(|_| CommandError::MissingEnvVar("SOLARA_ADMIN_PASSWORD"))?,
    };

    let pool = super::connect().await?;
    let user = AuthService::new(&pool)
        .create_user(email, name, role, &password)
        .await?;

    tracing::info!(admin_id = %user.id, email = %user.email, role = %user.role, "admin user created");
    Ok(())
}
