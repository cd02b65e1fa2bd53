//! Admin user management route handlers. SuperAdmin only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use solara_core::{AdminRole, AdminUserId};

use crate::db::AdminUserRepository;
use crate::error::AppError;
use crate::middleware::RequireSuperAdmin;
use crate::models::AdminUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// New admin user request.
#[derive(Debug, Deserialize)]
pub struct CreateAdminUserRequest {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub password: String,
}

/// Role change request.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: AdminRole,
}

/// List all admin users.
///
/// # Errors
///
/// Returns 403 for non-SuperAdmin callers.
pub async fn list(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    let users = AdminUserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// Create an admin user.
///
/// # Errors
///
/// Returns 409 for duplicate emails, 422 for weak passwords.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn create(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(body): Json<CreateAdminUserRequest>,
) -> Result<(StatusCode, Json<AdminUser>), AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .create_user(body.email.trim(), body.name.trim(), body.role, &body.password)
        .await?;

    tracing::info!(admin_id = %user.id, created_by = %admin.id, "admin user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Change an admin user's role.
///
/// The last active `SuperAdmin` cannot be demoted.
///
/// # Errors
///
/// Returns 409 when the change would leave no active SuperAdmin.
pub async fn update_role(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Path(id): Path<i32>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<AdminUser>, AppError> {
    let repo = AdminUserRepository::new(state.pool());
    let target = AdminUserId::new(id);

    let user = repo
        .get_by_id(target)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("admin user {id}")))?;

    if user.role == AdminRole::SuperAdmin
        && body.role != AdminRole::SuperAdmin
        && user.active
        && repo.count_active_by_role(AdminRole::SuperAdmin).await? <= 1
    {
        return Err(AppError::Conflict(
            "cannot demote the last active super admin".to_string(),
        ));
    }

    let updated = repo.update_role(target, body.role).await?;
    Ok(Json(updated))
}

/// Deactivate an admin user.
///
/// Admins cannot deactivate themselves, and the last active `SuperAdmin`
/// cannot be deactivated.
///
/// # Errors
///
/// Returns 409 for self-deactivation or removing the last SuperAdmin.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<i32>,
) -> Result<Json<AdminUser>, AppError> {
    let repo = AdminUserRepository::new(state.pool());
    let target = AdminUserId::new(id);

    if admin.id == target {
        return Err(AppError::Conflict(
            "cannot deactivate your own account".to_string(),
        ));
    }

    let user = repo
        .get_by_id(target)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("admin user {id}")))?;

    if user.role == AdminRole::SuperAdmin
        && user.active
        && repo.count_active_by_role(AdminRole::SuperAdmin).await? <= 1
    {
        return Err(AppError::Conflict(
            "cannot deactivate the last active super admin".to_string(),
        ));
    }

    let updated = repo.deactivate(target).await?;
    tracing::info!(admin_id = %updated.id, deactivated_by = %admin.id, "admin user deactivated");
    Ok(Json(updated))
}
