//! Client note domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use solara_core::{AdminUserId, ClientId, ClientNoteId};

/// A free-form note an admin left on a client profile
/// ("allergic to ammonia dye", "prefers Saturday mornings").
#[derive(Debug, Clone, Serialize)]
pub struct ClientNote {
    /// Unique note ID.
    pub id: ClientNoteId,
    /// Client the note is about.
    pub client_id: ClientId,
    /// Admin who wrote it.
    pub author_id: AdminUserId,
    /// Author display name, joined in for the UI.
    pub author_name: String,
    /// Note text.
    pub text: String,
    pub created_at: DateTime<Utc>,
}
