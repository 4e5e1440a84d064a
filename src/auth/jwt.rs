use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{error::ApiError, model::role::Role, models::Claims};

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

/// Signs a bearer token carrying the identity's id, email and role.
pub fn issue_token(
    id: i64,
    email: &str,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<String, ApiError> {
    let iat = now();
    let claims = Claims {
        sub: id,
        email: email.to_string(),
        role,
        iat,
        exp: iat + ttl,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Checks signature and expiry. Any failure (malformed input, signature
/// mismatch, expired token) comes back as the library error so callers
/// can decide how to report it.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_preserves_claims() {
        let token = issue_token(7, "alice@company.com", Role::Employee, SECRET, 3600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "alice@company.com");
        assert_eq!(claims.role, Role::Employee);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Validation::default() allows 60s of leeway, so back-date well
        // past it.
        let iat = now() - 7200;
        let claims = Claims {
            sub: 1,
            email: "admin@company.com".to_string(),
            role: Role::Admin,
            iat,
            exp: iat + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(7, "alice@company.com", Role::Employee, SECRET, 3600).unwrap();

        // Flip one character of the signature segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let sig = parts.last_mut().unwrap();
        let replacement = if sig.ends_with('A') { "B" } else { "A" };
        sig.replace_range(sig.len() - 1.., replacement);
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(7, "alice@company.com", Role::Employee, SECRET, 3600).unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
    }
}
