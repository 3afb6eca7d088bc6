use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::error::StoreError;

/// Minimum plaintext password length, counted in characters.
pub(crate) const MIN_PASSWORD_LEN: usize = 4;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed, lowercased form an email is stored and compared in.
pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn check_username(username: &str) -> Result<(), StoreError> {
    if username.trim().is_empty() {
        warn!("empty username rejected");
        return Err(StoreError::validation("username", "must not be empty"));
    }
    Ok(())
}

pub(crate) fn check_email(email: &str) -> Result<(), StoreError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email rejected");
        return Err(StoreError::validation("email", "not a valid email address"));
    }
    Ok(())
}

pub(crate) fn check_password(plain: &str) -> Result<(), StoreError> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        warn!("password below minimum length rejected");
        return Err(StoreError::validation(
            "password",
            "shorter than 4 characters",
        ));
    }
    Ok(())
}
