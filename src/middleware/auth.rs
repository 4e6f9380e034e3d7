//! Bearer-token authentication.
//!
//! Verifies signature, algorithm, and expiry of inbound bearer tokens against
//! a process-wide RSA public key (the trust anchor), loaded once at startup
//! and shared read-only by all concurrent verifications. Verification is
//! stateless: no caching, no revocation checks, no refresh.

use crate::types::{Error, Result};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verified token claims.
///
/// `scopes` is kept as raw JSON on purpose: a malformed scopes claim is an
/// authorization failure (403 "scope malformed"), not a decode failure, so
/// shape checking belongs to the authorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry as a Unix timestamp; enforced during decoding.
    pub exp: u64,

    #[serde(default)]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Value>,
}

/// RS256 bearer-token verifier.
pub struct TokenAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenAuthenticator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenAuthenticator {
    /// Build a verifier from a PEM-encoded RSA public key.
    ///
    /// Called once at startup; a bad key is fatal there, never per-call.
    pub fn from_pem(public_key_pem: &[u8]) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| Error::internal(format!("invalid RSA public key pem: {}", e)))?;

        // Only RS256 is accepted; tokens declaring any other algorithm are
        // rejected even if that algorithm would validate.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify a bearer token and return its claims.
    ///
    /// - `None`/empty → 403, no credential provided.
    /// - expired → 401 "Token expired".
    /// - wrong signature, wrong key, or non-RS256 algorithm → 401 "Invalid token".
    pub fn verify(&self, token: Option<&str>) -> Result<Claims> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(Error::forbidden("No credential provided, NOT AUTHORIZED"));
            }
        };

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Error::unauthorized("Token expired, NOT AUTHORIZED")
                }
                _ => {
                    tracing::debug!(error = %e, "token verification failed");
                    Error::unauthorized("Invalid token, NOT AUTHORIZED")
                }
            })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const PUBLIC_PEM: &str = include_str!("../../tests/fixtures/rsa_public.pem");
    const PRIVATE_PEM: &str = include_str!("../../tests/fixtures/rsa_private.pem");
    const OTHER_PRIVATE_PEM: &str = include_str!("../../tests/fixtures/rsa_private_other.pem");

    fn authenticator() -> TokenAuthenticator {
        TokenAuthenticator::from_pem(PUBLIC_PEM.as_bytes()).unwrap()
    }

    fn mint(claims: &Claims, private_pem: &str) -> String {
        let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
    }

    fn claims_expiring_in(seconds: i64) -> Claims {
        Claims {
            sub: Some("agent-1".to_string()),
            exp: (chrono::Utc::now().timestamp() + seconds) as u64,
            iss: None,
            scopes: Some(json!(["tool:read"])),
        }
    }

    #[test]
    fn rejects_missing_or_empty_credential() {
        let auth = authenticator();
        assert_eq!(auth.verify(None).unwrap_err().status_code(), 403);
        assert_eq!(auth.verify(Some("")).unwrap_err().status_code(), 403);
    }

    #[test]
    fn accepts_a_valid_token() {
        let auth = authenticator();
        let token = mint(&claims_expiring_in(3600), PRIVATE_PEM);
        let claims = auth.verify(Some(&token)).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("agent-1"));
        assert_eq!(claims.scopes, Some(json!(["tool:read"])));
    }

    #[test]
    fn rejects_an_expired_token() {
        let auth = authenticator();
        // Past the default leeway
        let token = mint(&claims_expiring_in(-600), PRIVATE_PEM);
        let err = auth.verify(Some(&token)).unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn rejects_a_token_signed_under_a_different_key() {
        let auth = authenticator();
        let token = mint(&claims_expiring_in(3600), OTHER_PRIVATE_PEM);
        let err = auth.verify(Some(&token)).unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert!(err.to_string().contains("Invalid token"));
    }

    #[test]
    fn rejects_garbage_tokens() {
        let auth = authenticator();
        let err = auth.verify(Some("not-a-jwt")).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn debug_omits_key_material() {
        let auth = authenticator();
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("decoding_key"));
    }
}
