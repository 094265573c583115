//! Account authentication.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Signup credential checks

mod password;

pub use password::{PasswordError, hash_password, verify_password};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 64;

/// Checks signup credentials and returns the normalized username.
///
/// Usernames are trimmed; passwords are taken as given.
///
/// # Errors
///
/// Returns one message per rejected field.
pub fn check_credentials(username: &str, password: &str) -> Result<String, Vec<String>> {
    let username = username.trim();
    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push("Username is required".to_string());
    } else if username.chars().count() > MAX_USERNAME_LEN {
        errors.push(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        ));
    }
    if password.is_empty() {
        errors.push("Password is required".to_string());
    }

    if errors.is_empty() {
        Ok(username.to_string())
    } else {
        Err(errors)
    }
}
