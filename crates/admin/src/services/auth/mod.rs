//! Authentication service for admin users.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use solara_core::{AdminRole, AdminUserId, Email};

use crate::db::RepositoryError;
use crate::db::admin_users::AdminUserRepository;
use crate::models::AdminUser;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 10;

/// Authentication service.
///
/// Handles admin login and account creation. Account creation is reachable
/// from the SuperAdmin routes and from the CLI.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// Deactivated accounts are rejected the same way as wrong passwords;
    /// the caller maps both to a uniform 401.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Inactive` if the account is deactivated.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.active {
            return Err(AuthError::Inactive);
        }

        Ok(user)
    }

    /// Create a new admin user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: AdminRole,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, name, role, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Get an admin user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, id: AdminUserId) -> Result<AdminUser, AuthError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("ninechars"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("ten-chars!").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("um segredo enorme").expect("hashing succeeds");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("um segredo enorme", &hash).is_ok());
        assert!(matches!(
            verify_password("senha errada", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
