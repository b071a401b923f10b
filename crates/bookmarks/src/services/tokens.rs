//! Bearer token verification.
//!
//! The HTTP edge turns an `Authorization: Bearer <jwt>` header into a
//! [`Caller`](crate::models::Caller) through a [`TokenVerifier`]. The only
//! shipped verifier checks HS256 signatures against a shared secret.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use inkshelf_core::UserId;

/// Errors from token verification or issuance.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature, expiry or format check failed.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// The token's subject is not a usable user ID.
    #[error("invalid token subject: {0}")]
    Subject(#[from] inkshelf_core::IdError),
}

/// JWT claims understood by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID of the caller.
    pub sub: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: u64,
}

/// Turns a bearer token into a user ID.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and return the user it was issued to.
    async fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

/// HS256 verifier with a shared secret.
pub struct Hs256Verifier {
    decoding: DecodingKey,
    encoding: EncodingKey,
}

impl std::fmt::Debug for Hs256Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hs256Verifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Hs256Verifier {
    /// Create a verifier for tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            decoding: DecodingKey::from_secret(bytes),
            encoding: EncodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for `user` valid for `ttl`.
    ///
    /// Used by the CLI and tests; end-user sign-in lives elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if encoding fails.
    pub fn issue(&self, user: &UserId, ttl: Duration) -> Result<String, TokenError> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let claims = Claims {
            sub: user.as_str().to_owned(),
            exp: now.saturating_add(ttl.as_secs()),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

#[async_trait]
impl TokenVerifier for Hs256Verifier {
    async fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(UserId::parse(&data.claims.sub)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier(secret: &str) -> Hs256Verifier {
        Hs256Verifier::new(&SecretString::from(secret.to_owned()))
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let v = verifier("k3Yp9vQz!mR2xW7nB4tLc8Hd5Jf1Gs6A");
        let user = UserId::parse("u1").unwrap();

        let token = v.issue(&user, Duration::from_secs(60)).unwrap();
        assert_eq!(v.verify(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let signer = verifier("k3Yp9vQz!mR2xW7nB4tLc8Hd5Jf1Gs6A");
        let other = verifier("Zq8!rT3wY6uI1oP4aS7dF0gH2jK5lX9c");
        let token = signer
            .issue(&UserId::parse("u1").unwrap(), Duration::from_secs(60))
            .unwrap();

        assert!(matches!(
            other.verify(&token).await,
            Err(TokenError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let v = verifier("k3Yp9vQz!mR2xW7nB4tLc8Hd5Jf1Gs6A");
        let claims = Claims {
            sub: "u1".to_owned(),
            exp: 1_000,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &v.encoding).unwrap();

        assert!(v.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_garbage_rejected() {
        let v = verifier("k3Yp9vQz!mR2xW7nB4tLc8Hd5Jf1Gs6A");
        assert!(v.verify("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn test_subject_must_be_valid_user_id() {
        let v = verifier("k3Yp9vQz!mR2xW7nB4tLc8Hd5Jf1Gs6A");
        let claims = Claims {
            sub: "a/b".to_owned(),
            exp: 32_503_680_000,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &v.encoding).unwrap();

        assert!(matches!(
            v.verify(&token).await,
            Err(TokenError::Subject(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let v = verifier("k3Yp9vQz!mR2xW7nB4tLc8Hd5Jf1Gs6A");
        let debug = format!("{v:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("k3Yp9"));
    }
}
