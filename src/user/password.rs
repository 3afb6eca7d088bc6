use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::StoreError;

// Fixed work factor. The parameters travel inside each PHC string, so
// stored hashes stay verifiable if these ever change.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

fn hasher() -> Result<Argon2<'static>, StoreError> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|e| StoreError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Derive a salted hash of `plain`.
pub fn hash(plain: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            StoreError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Hash on a blocking thread so derivation does not stall the executor.
pub async fn hash_blocking(plain: String) -> Result<String, StoreError> {
    tokio::task::spawn_blocking(move || hash(&plain))
        .await
        .map_err(|e| StoreError::Hash(e.to_string()))?
}

/// Compare a candidate against a stored hash. Returns false for a wrong
/// password; errors only when the stored hash cannot be parsed.
pub fn verify(candidate: &str, stored: &str) -> Result<bool, StoreError> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "malformed stored password hash");
        StoreError::Hash(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let plain = "hunter42";
        let hash = hash(plain).expect("hashing should succeed");
        assert!(verify(plain, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash("hunter42").expect("hashing should succeed");
        assert!(!verify("hunter43", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify("hunter42", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, StoreError::Hash(_)));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let first = hash("password1234").expect("hash");
        let second = hash("password1234").expect("hash");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn hash_blocking_matches_sync_scheme() {
        let hash = hash_blocking("password1234".into()).await.expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify("password1234", &hash).expect("verify"));
    }
}
