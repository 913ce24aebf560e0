/// JWT token codec
///
/// Encodes and decodes the signed, expiring identity token carried by API
/// clients. Tokens are HS256-signed with a process-wide secret and expire
/// 30 days after issuance by default. Validity is solely a function of the
/// signature and the expiry instant; there is no server-side revocation
/// list, and rotating the secret invalidates every outstanding token.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default token lifetime in days.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// The authenticated user extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// JWT claims: registered claims plus the identity fields
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token verification and issuance failures.
///
/// `Expired` and `Invalid` are deliberately distinct: callers surface
/// different messages for a token that was once good versus one that never
/// was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("token signing failed")]
    Signing,
}

/// Issues and verifies identity tokens with an injected secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec around a shared secret. `ttl_days` controls how far in
    /// the future issued tokens expire.
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Sign a token carrying the given identity.
    ///
    /// Pure computation: no clock is read other than for the `iat`/`exp`
    /// claims, and no state is mutated.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            username: identity.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and extract the identity it carries.
    ///
    /// Returns `TokenError::Expired` when the expiry instant has passed and
    /// `TokenError::Invalid` for any other failure: bad signature, malformed
    /// structure, or a payload whose subject is not a UUID.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)?;

        Ok(Identity {
            id,
            email: data.claims.email,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret";

    fn test_identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
        }
    }

    #[test]
    fn test_issue_produces_three_part_token() {
        let codec = TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_DAYS);
        let token = codec.issue(&test_identity()).expect("issue should succeed");
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_verify_roundtrip_yields_original_identity() {
        let codec = TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_DAYS);
        let identity = test_identity();
        let token = codec.issue(&identity).expect("issue should succeed");

        let verified = codec.verify(&token).expect("verify should succeed");
        assert_eq!(verified, identity);
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        // Negative TTL puts `exp` a full day in the past, well beyond the
        // decoder's leeway window.
        let codec = TokenCodec::new(TEST_SECRET, -1);
        let token = codec.issue(&test_identity()).expect("issue should succeed");

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let codec = TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_DAYS);
        let token = codec.issue(&test_identity()).expect("issue should succeed");

        let tampered = token.replace('a', "b");
        assert_eq!(codec.verify(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let codec = TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_DAYS);
        let other = TokenCodec::new("other-secret", DEFAULT_TOKEN_TTL_DAYS);
        let token = codec.issue(&test_identity()).expect("issue should succeed");

        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let codec = TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_DAYS);
        assert_eq!(codec.verify("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let codec = TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_DAYS);
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode should succeed");

        assert_eq!(codec.verify(&token), Err(TokenError::Invalid));
    }
}
