/**
 * JWT Tokens
 *
 * Token generation and verification for user sessions. Tokens are HS256
 * with the user id as `sub` and a one hour expiry.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Token lifetime in seconds (one hour).
const TOKEN_TTL_SECS: u64 = 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|err| {
        tracing::warn!("Missing JWT_SECRET ({}), using insecure default", err);
        "change-me-in-production".to_string()
    })
}

/// Create a JWT token for a user.
pub fn create_token(user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token.
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // These tests read and write the JWT_SECRET environment variable,
    // which is process-global state, so they run serially.

    #[test]
    #[serial]
    fn test_create_and_verify_token() {
        std::env::remove_var("JWT_SECRET");

        let user_id = Uuid::new_v4();
        let token = create_token(user_id).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    #[serial]
    fn test_token_subject_parses_back_to_user_id() {
        std::env::remove_var("JWT_SECRET");

        let user_id = Uuid::new_v4();
        let token = create_token(user_id).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(Uuid::parse_str(&claims.sub).unwrap(), user_id);
    }

    #[test]
    #[serial]
    fn test_secret_change_invalidates_tokens() {
        std::env::set_var("JWT_SECRET", "first-secret");
        let token = create_token(Uuid::new_v4()).unwrap();
        assert!(verify_token(&token).is_ok());

        std::env::set_var("JWT_SECRET", "second-secret");
        assert!(verify_token(&token).is_err());

        std::env::remove_var("JWT_SECRET");
    }

    #[test]
    #[serial]
    fn test_verify_invalid_token() {
        assert!(verify_token("invalid.token.here").is_err());
    }

    #[test]
    #[serial]
    fn test_tampered_token_rejected() {
        std::env::remove_var("JWT_SECRET");

        let token = create_token(Uuid::new_v4()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('a') { 'b' } else { 'a' });
        assert!(verify_token(&tampered).is_err());
    }
}
