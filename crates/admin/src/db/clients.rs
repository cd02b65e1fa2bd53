//! Client repository for admin operations: CRUD, credit, and notes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{AdminUserId, Client, ClientId, ClientNoteId, Email};

use super::RepositoryError;
use crate::models::ClientNote;

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i32,
    name: String,
    email: String,
    phone: String,
    credit_balance: Decimal,
    profile_completed: bool,
    welcomed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = RepositoryError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ClientId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            credit_balance: row.credit_balance,
            profile_completed: row.profile_completed,
            welcomed: row.welcomed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClientNoteRow {
    id: i32,
    client_id: i32,
    author_id: i32,
    author_name: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<ClientNoteRow> for ClientNote {
    fn from(row: ClientNoteRow) -> Self {
        Self {
            id: ClientNoteId::new(row.id),
            client_id: ClientId::new(row.client_id),
            author_id: AdminUserId::new(row.author_id),
            author_name: row.author_name,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

const CLIENT_COLUMNS: &str = "id, name, email, phone, credit_balance, profile_completed, \
     welcomed, created_at, updated_at";

/// Repository for client database operations (admin side).
pub struct ClientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClientRepository<'a> {
    /// Create a new client repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List clients, optionally filtered by a name/email search term.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Client>, RepositoryError> {
        let rows = match search {
            Some(q) => {
                let pattern = format!("%{}%", q.trim());
                sqlx::query_as::<_, ClientRow>(&format!(
                    "SELECT {CLIENT_COLUMNS} FROM client
                     WHERE name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1
                     ORDER BY name"
                ))
                .bind(pattern)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ClientRow>(&format!(
                    "SELECT {CLIENT_COLUMNS} FROM client ORDER BY name"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a client by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM client WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a walk-in client without credentials.
    ///
    /// The client can later claim the account through the booking API's
    /// password-reset flow; until then the row has no password hash and
    /// cannot log in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        phone: &str,
    ) -> Result<Client, RepositoryError> {
        let profile_completed = !name.is_empty() && !phone.is_empty();

        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "INSERT INTO client (email, name, phone, profile_completed)
             VALUES ($1, $2, $3, $4)
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(phone)
        .bind(profile_completed)
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

    /// Update a client's contact details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    pub async fn update(
        &self,
        id: ClientId,
        email: &Email,
        name: &str,
        phone: &str,
    ) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE client
             SET email = $1, name = $2, phone = $3,
                 profile_completed = profile_completed OR ($2 <> '' AND $3 <> ''),
                 updated_at = now()
             WHERE id = $4
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(phone)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a client.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    /// Returns `RepositoryError::Conflict` if the client has history
    /// (appointments or comandas) that must be kept.
    pub async fn delete(&self, id: ClientId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM client WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "client has appointments or comandas and cannot be deleted".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Adjust a client's credit balance by a signed amount.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the adjustment would drive the
    /// balance negative.
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    pub async fn adjust_credit(
        &self,
        id: ClientId,
        delta: Decimal,
    ) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE client
             SET credit_balance = credit_balance + $1, updated_at = now()
             WHERE id = $2
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(delta)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_check_violation()
            {
                return RepositoryError::Invalid(
                    "credit balance cannot go negative".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// List a client's notes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_notes(&self, id: ClientId) -> Result<Vec<ClientNote>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClientNoteRow>(
            "SELECT n.id, n.client_id, n.author_id, a.name AS author_name, n.text, n.created_at
             FROM client_note n
             JOIN admin_user a ON a.id = n.author_id
             WHERE n.client_id = $1
             ORDER BY n.created_at DESC",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a note to a client profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    pub async fn add_note(
        &self,
        id: ClientId,
        author: AdminUserId,
        text: &str,
    ) -> Result<ClientNote, RepositoryError> {
        let row = sqlx::query_as::<_, ClientNoteRow>(
            "WITH inserted AS (
                 INSERT INTO client_note (client_id, author_id, text)
                 VALUES ($1, $2, $3)
                 RETURNING id, client_id, author_id, text, created_at
             )
             SELECT i.id, i.client_id, i.author_id, a.name AS author_name, i.text, i.created_at
             FROM inserted i
             JOIN admin_user a ON a.id = i.author_id",
        )
        .bind(id.as_i32())
        .bind(author.as_i32())
        .bind(text)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
