use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::StoreError;
use crate::user::password;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64, // assigned by the database
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, not exposed in JSON
}

impl User {
    /// Check a login candidate against the stored hash.
    ///
    /// Returns false for a wrong password; errors only when the stored
    /// hash cannot be parsed.
    pub fn verify_password(&self, candidate: &str) -> Result<bool, StoreError> {
        password::verify(candidate, &self.password_hash)
    }
}

/// Fields required to create a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String, // plaintext, hashed before it reaches storage
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>, // plaintext, rehashed only when present
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "lernantino".into(),
            email: "lernantino@example.com".into(),
            password_hash: password::hash("hunter42").expect("hash"),
        }
    }

    #[test]
    fn serialization_never_exposes_the_hash() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("lernantino@example.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn verify_password_checks_against_stored_hash() {
        let user = sample_user();
        assert!(user.verify_password("hunter42").expect("verify"));
        assert!(!user.verify_password("hunter43").expect("verify"));
    }
}
