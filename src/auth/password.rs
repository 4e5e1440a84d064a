use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ApiError;

/// Salted one-way hash. A fresh salt is drawn per call, so hashing the
/// same plaintext twice yields different strings.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks a plaintext against a stored hash. A stored value that does not
/// parse as a hash verifies as false instead of erroring.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    let argon2 = Argon2::default();

    match PasswordHash::new(hashed) {
        Ok(parsed) => argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_salts_every_call() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_matching_password() {
        let hashed = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hashed));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hashed = hash_password("admin123").unwrap();
        assert!(!verify_password("admin124", &hashed));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("admin123", "not-a-phc-string"));
    }
}
