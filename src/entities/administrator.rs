//! Administrator entity - tenant owning categories and dishes

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// verified against when the email has no account
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("menu-api-unknown-account", DEFAULT_COST).ok());

/// Identifier of an administrator.
///
/// Every ownership-scoped query is filtered by this value, and it is only ever
/// obtained from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct AdminId(pub i64);

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Administrator {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
}

impl Administrator {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password_hash).unwrap_or(false)
    }

    /// Burns one bcrypt verification for an email with no account; always false
    pub fn verify_unknown_account(target_password: &str) -> bool {
        if let Some(ref dummy) = *UNKNOWN_ACCOUNT_HASH {
            let _ = verify(target_password, dummy);
        }
        false
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }
}
