//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use solara_core::{AdminRole, AdminUserId, Email};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
/// The role is a snapshot from login time; role changes take effect on the
/// next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin user's database ID.
    pub id: AdminUserId,
    /// Admin user's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role at login time.
    pub role: AdminRole,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
