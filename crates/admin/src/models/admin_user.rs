//! Admin user domain types.
//!
//! The password hash never appears here; it only exists inside the `db`
//! layer, so no API response can leak one by construction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use solara_core::{AdminRole, AdminUserId, Email};

/// A staff account with role-based access to the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Display name.
    pub name: String,
    /// Login email, unique per admin user.
    pub email: Email,
    /// Role deciding what the account may do.
    pub role: AdminRole,
    /// Deactivated accounts cannot log in; kept for audit history.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
