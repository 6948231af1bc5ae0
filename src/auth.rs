//! Session tokens for the control plane
//!
//! A session is an HS256 JWT carrying `valid`, `iat` and `exp` claims,
//! stored in the `token` cookie.

use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "token";
pub const SESSION_TTL_SECS: i64 = 5 * 24 * 60 * 60;

/// JWT claims of a control-plane session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub valid: bool,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    secret: Vec<u8>,
    password: String,
}

impl SessionKeys {
    pub fn new(secret: &str, password: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            secret: secret.as_bytes().to_vec(),
            password: password.to_string(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        // Compare MACs so the comparison time does not depend on the password.
        let mut expected = self.mac();
        expected.update(self.password.as_bytes());
        let mut given = self.mac();
        given.update(candidate.as_bytes());
        given.verify_slice(&expected.finalize().into_bytes()).is_ok()
    }

    /// Sign a session valid for `SESSION_TTL_SECS` from `now` (unix seconds).
    pub fn issue(&self, now: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            valid: true,
            iat: now.max(0) as u64,
            exp: (now + SESSION_TTL_SECS).max(0) as u64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Check signature, algorithm and expiry against the current clock.
    pub fn verify(&self, token: &str) -> bool {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.valid)
            .unwrap_or(false)
    }
}
