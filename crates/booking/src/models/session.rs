//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use solara_core::{ClientId, Email};

/// Session-stored client identity.
///
/// Minimal data stored in the session to identify the logged-in client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentClient {
    /// Client's database ID.
    pub id: ClientId,
    /// Client's email address.
    pub email: Email,
    /// Display name, for greeting without a database round trip.
    pub name: String,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in client.
    pub const CURRENT_CLIENT: &str = "current_client";
}
