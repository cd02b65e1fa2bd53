//! Client account repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{Client, ClientId, Email};

use super::RepositoryError;

/// Internal row type for client queries.
///
/// Carries the password hash; it is stripped before the row becomes a
/// domain [`Client`].
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

const CLIENT_COLUMNS: &str = "id, name, email, phone, credit_balance, profile_completed, \
     welcomed, created_at, updated_at";

/// Repository for client account database operations.
pub struct ClientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClientRepository<'a> {
    /// Create a new client repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new client with a password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<Client, RepositoryError> {
        let profile_completed = !name.is_empty() && !phone.is_empty();

        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "INSERT INTO client (email, name, phone, password_hash, profile_completed)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(phone)
        .bind(password_hash)
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

    /// Get a client by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM client WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a client and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Client, String)>, RepositoryError> {
        // Walk-in clients created by admins have no hash and cannot log in.
        let row = sqlx::query_as::<_, ClientAuthRow>(&format!(
            "SELECT {CLIENT_COLUMNS}, password_hash FROM client
             WHERE email = $1 AND password_hash IS NOT NULL"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let hash = r.password_hash.clone();
            Client::try_from(r.client).map(|c| (c, hash))
        })
        .transpose()
    }

    /// Update a client's contact profile.
    ///
    /// `profile_completed` is derived server-side: it is set once both name
    /// and phone are non-empty, and never unset afterwards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: ClientId,
        name: &str,
        phone: &str,
    ) -> Result<Client, RepositoryError> {
        let completed = !name.is_empty() && !phone.is_empty();

        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE client
             SET name = $1, phone = $2,
                 profile_completed = profile_completed OR $3,
                 updated_at = now()
             WHERE id = $4
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(name)
        .bind(phone)
        .bind(completed)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Mark the client as welcomed. Idempotent, never unsets.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    pub async fn set_welcomed(&self, id: ClientId) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE client SET welcomed = TRUE, updated_at = now()
             WHERE id = $1
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}

/// Row for login queries: client columns plus the password hash.
#[derive(Debug, sqlx::FromRow)]
struct ClientAuthRow {
    #[sqlx(flatten)]
    client: ClientRow,
    password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_strips_hash_and_validates_email() {
        let row = ClientRow {
            id: 1,
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: "+55 11 99999-0000".to_owned(),
            credit_balance: Decimal::ZERO,
            profile_completed: true,
            welcomed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let client = Client::try_from(row).expect("valid row");
        assert_eq!(client.id.as_i32(), 1);
        assert_eq!(client.email.as_str(), "ana@example.com");

        // The domain type has no password field at all; serializing it can
        // never leak a hash.
        let json = serde_json::to_value(&client).expect("serializable");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_row_conversion_rejects_corrupt_email() {
        let row = ClientRow {
            id: 2,
            name: "Bia".to_owned(),
            email: "not-an-email".to_owned(),
            phone: String::new(),
            credit_balance: Decimal::ZERO,
            profile_completed: false,
            welcomed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(matches!(
            Client::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
