//! Admin user repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use solara_core::{AdminRole, AdminUserId, Email};

use super::RepositoryError;
use crate::models::AdminUser;

/// Internal row type for admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    name: String,
    email: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: AdminRole = row.role.parse().map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: AdminUserId::new(row.id),
            name: row.name,
            email,
            role,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AdminUserAuthRow {
    #[sqlx(flatten)]
    user: AdminUserRow,
    password_hash: String,
}

const ADMIN_USER_COLUMNS: &str = "id, name, email, role, active, created_at, updated_at";

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_user ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an admin user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_user WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an admin user and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserAuthRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS}, password_hash FROM admin_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let hash = r.password_hash.clone();
            AdminUser::try_from(r.user).map(|u| (u, hash))
        })
        .transpose()
    }

    /// Create a new admin user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: AdminRole,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "INSERT INTO admin_user (email, name, role, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {ADMIN_USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(role.to_string())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Update an admin user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_role(
        &self,
        id: AdminUserId,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "UPDATE admin_user SET role = $1, updated_at = now()
             WHERE id = $2
             RETURNING {ADMIN_USER_COLUMNS}"
        ))
        .bind(role.to_string())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Deactivate an admin user. Sessions already issued keep their role
    /// snapshot but the account can no longer log in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn deactivate(&self, id: AdminUserId) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "UPDATE admin_user SET active = FALSE, updated_at = now()
             WHERE id = $1
             RETURNING {ADMIN_USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Count active admin users with the given role.
    ///
    /// Used to protect the last active `SuperAdmin` from demotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_active_by_role(&self, role: AdminRole) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admin_user WHERE role = $1 AND active",
        )
        .bind(role.to_string())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
