//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. Sessions hold
//! the logged-in user and the shopping cart; both live server-side. The
//! cookie carries only the session id, signed with a key derived from the
//! configured session secret so a tampered cookie is rejected before any
//! store lookup.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "voltshop_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store and a signed cookie.
///
/// Runs the store's own migration to create the sessions table. The signing
/// key is derived from the configured session secret; config validation
/// guarantees the 32-byte minimum `Key::derive_from` requires.
///
/// # Errors
///
/// Returns a database error if the session table migration fails.
pub async fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, sqlx::Error> {
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;

    let signing_key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    // Secure cookies whenever the public URL is served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_derives_from_minimum_length_secret() {
        // Config enforces a 32-character minimum on the session secret,
        // which satisfies Key::derive_from's 32-byte floor.
        let secret = "a".repeat(32);
        let _key = Key::derive_from(secret.as_bytes());
    }
}
