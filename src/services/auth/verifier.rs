/*
 * Responsibility
 * - bearer access-token verification (signature + exp)
 * - claims stay opaque to callers except `sub`
 */
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token.
///
/// Only `sub` (the principal's email) is interpreted downstream; everything
/// else the token may carry is ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: u64,
}

/// Verification capability consumed by the auth resolver.
pub trait TokenVerify: Send + Sync {
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// HS256 access-token verifier.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenVerify for JwtVerifier {
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "unit-test-secret";

    #[derive(Serialize)]
    struct SignedClaims<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        sub: Option<&'a str>,
        exp: i64,
    }

    fn sign(secret: &str, sub: Option<&str>, exp: i64) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &SignedClaims { sub, exp },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn verifies_a_well_formed_token() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let token = sign(SECRET, Some("nurse@hospital.kr"), in_one_hour());

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("nurse@hospital.kr"));
    }

    #[test]
    fn rejects_an_expired_token() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let token = sign(SECRET, Some("nurse@hospital.kr"), chrono::Utc::now().timestamp() - 3600);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_a_token_signed_with_another_key() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let token = sign("some-other-secret", Some("nurse@hospital.kr"), in_one_hour());

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let verifier = JwtVerifier::new(SECRET, 0);

        assert!(verifier.verify("not-a-jwt").is_err());
    }

    #[test]
    fn surfaces_a_missing_subject_as_none() {
        let verifier = JwtVerifier::new(SECRET, 0);
        let token = sign(SECRET, None, in_one_hour());

        let claims = verifier.verify(&token).unwrap();
        assert!(claims.sub.is_none());
    }
}
