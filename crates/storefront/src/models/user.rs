//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use voltshop_core::{Email, Role, UserId};

/// A registered storefront user.
///
/// The password digest deliberately lives outside this type; it only ever
/// exists in the credential store and the authentication path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's normalized email address.
    pub email: Email,
    /// Role used for admin authorization.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
