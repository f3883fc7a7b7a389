//! Authentication service.
//!
//! Registration, login, and the admin bootstrap. Passwords are digested
//! with Argon2id; the plaintext never reaches the database layer.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use voltshop_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols accepted by the password policy.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// The email is normalized (trim + lowercase) during parsing, so two
    /// case-variant registrations of the same address collide on the unique
    /// constraint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password fails the policy.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, &password_hash, Role::User)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password, without distinguishing the two.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Ensure the configured admin account exists, creating it on first boot.
    ///
    /// The password comes from mandatory configuration and is held to the
    /// same policy as user passwords. An existing account is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the configured password fails
    /// the policy, or a repository error if the lookup/insert fails.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Ok(());
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        match self.users.create(&email, &password_hash, Role::Admin).await {
            Ok(user) => {
                tracing::info!(email = %user.email, "Bootstrapped admin account");
                Ok(())
            }
            // A concurrent boot created it first
            Err(RepositoryError::Conflict(_)) => Ok(()),
            Err(other) => Err(AuthError::Repository(other)),
        }
    }
}

/// Validate a password against the strength policy: at least 8 characters,
/// with an uppercase letter, a lowercase letter, a digit, and a symbol.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "password must contain an uppercase letter".to_owned(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword(
            "password must contain a lowercase letter".to_owned(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "password must contain a digit".to_owned(),
        ));
    }

    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(AuthError::WeakPassword(format!(
            "password must contain a symbol ({PASSWORD_SYMBOLS})"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored digest (constant-time comparison
/// inside the argon2 crate).
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_accepts_strong() {
        assert!(validate_password("Str0ng!pass").is_ok());
        assert!(validate_password("Admin123!").is_ok());
        assert!(validate_password("aB3$xY9?zz").is_ok());
    }

    #[test]
    fn test_validate_password_too_short() {
        let err = validate_password("aB3$").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn test_validate_password_missing_uppercase() {
        assert!(validate_password("str0ng!pass").is_err());
    }

    #[test]
    fn test_validate_password_missing_lowercase() {
        assert!(validate_password("STR0NG!PASS").is_err());
    }

    #[test]
    fn test_validate_password_missing_digit() {
        assert!(validate_password("Strong!pass").is_err());
    }

    #[test]
    fn test_validate_password_missing_symbol() {
        assert!(validate_password("Str0ngpass").is_err());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("Str0ng!pass").unwrap();
        assert!(verify_password("Str0ng!pass", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("Str0ng!pass").unwrap();
        assert!(matches!(
            verify_password("Wr0ng!pass!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("Str0ng!pass").unwrap();
        assert!(!hash.contains("Str0ng!pass"));
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Str0ng!pass").unwrap();
        let b = hash_password("Str0ng!pass").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_digest() {
        assert!(matches!(
            verify_password("Str0ng!pass", "not-a-digest"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
