//! Authentication types for JWT and credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(account_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: account_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }
}

/// Signup and login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Signup response payload.
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    /// Human readable outcome.
    pub message: &'static str,
    /// Access token for the new account.
    pub token: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token.
    pub token: String,
}
