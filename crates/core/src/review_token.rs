//! Signed, time-limited review invitation tokens.
//!
//! A token binds `(ride_id, passenger_id)` to an expiry and is signed with
//! HMAC-SHA256:
//!
//! ```text
//! <ride_id>.<passenger_id>.<expires_at_unix>.<hex(hmac(secret, "<ride_id>.<passenger_id>.<expires_at_unix>"))>
//! ```
//!
//! Tokens are stateless; the review store enforces one review per pair.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Default invitation lifetime.
pub const DEFAULT_TTL_HOURS: i64 = 168;

/// The claims carried by a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewClaims {
    pub ride_id: DbId,
    pub passenger_id: DbId,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Review invitation has expired")]
    Expired,

    #[error("Review invitation is invalid")]
    Invalid,
}

/// Issues and verifies review invitation tokens with a shared secret.
#[derive(Clone)]
pub struct ReviewTokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for ReviewTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewTokenSigner").finish_non_exhaustive()
    }
}

impl ReviewTokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Issue a token valid for `ttl` from now.
    pub fn issue(&self, ride_id: DbId, passenger_id: DbId, ttl: Duration) -> String {
        self.issue_at(ride_id, passenger_id, Utc::now() + ttl)
    }

    /// Issue a token expiring at `expires_at`.
    pub fn issue_at(&self, ride_id: DbId, passenger_id: DbId, expires_at: Timestamp) -> String {
        let payload = format!("{ride_id}.{passenger_id}.{}", expires_at.timestamp());
        let signature = hex::encode(self.mac(&payload).finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<ReviewClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against `now`. The signature is checked before expiry,
    /// so a tampered token is always `Invalid`, never `Expired`.
    pub fn verify_at(&self, token: &str, now: Timestamp) -> Result<ReviewClaims, TokenError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::Invalid)?;
        let signature = hex::decode(signature).ok_or(TokenError::Invalid)?;
        self.mac(payload)
            .verify_slice(&signature)
            .map_err(|_| TokenError::Invalid)?;

        let mut parts = payload.split('.');
        let (Some(ride), Some(passenger), Some(expires), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Invalid);
        };
        let ride_id: DbId = ride.parse().map_err(|_| TokenError::Invalid)?;
        let passenger_id: DbId = passenger.parse().map_err(|_| TokenError::Invalid)?;
        let expires_unix: i64 = expires.parse().map_err(|_| TokenError::Invalid)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(expires_unix, 0).ok_or(TokenError::Invalid)?;

        if expires_at <= now {
            return Err(TokenError::Expired);
        }
        Ok(ReviewClaims {
            ride_id,
            passenger_id,
            expires_at,
        })
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        mac
    }
}

// ---------------------------------------------------------------------------
// hex encoding helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string, `None` on odd length or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 || !s.is_ascii() {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> ReviewTokenSigner {
        ReviewTokenSigner::new("review-secret-for-tests")
    }

    #[test]
    fn issued_token_verifies() {
        let token = signer().issue(12, 34, Duration::hours(1));
        let claims = signer().verify(&token).expect("fresh token should verify");
        assert_eq!(claims.ride_id, 12);
        assert_eq!(claims.passenger_id, 34);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let token = signer().issue_at(1, 2, now - Duration::minutes(1));
        assert_eq!(signer().verify_at(&token, now), Err(TokenError::Expired));
    }

    #[test]
    fn token_expires_exactly_at_deadline() {
        let now = Utc::now();
        let token = signer().issue_at(1, 2, now + Duration::seconds(10));
        assert!(signer().verify_at(&token, now).is_ok());
        assert_eq!(
            signer().verify_at(&token, now + Duration::seconds(10)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_passenger_is_invalid() {
        let token = signer().issue(1, 2, Duration::hours(1));
        let forged = token.replacen("1.2.", "1.3.", 1);
        assert_eq!(signer().verify(&forged), Err(TokenError::Invalid));
    }

    #[test]
    fn tampered_expired_token_is_invalid_not_expired() {
        let now = Utc::now();
        let token = signer().issue_at(1, 2, now - Duration::hours(1));
        let forged = token.replacen("1.2.", "9.2.", 1);
        assert_eq!(signer().verify_at(&forged, now), Err(TokenError::Invalid));
    }

    #[test]
    fn other_secret_is_invalid() {
        let token = signer().issue(1, 2, Duration::hours(1));
        let other = ReviewTokenSigner::new("another-secret");
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn malformed_tokens_are_invalid() {
        for token in ["", "abc", "1.2.3", "1.2.3.zz", "1.2.x.00", "1.2.3.4.00"] {
            assert_eq!(signer().verify(token), Err(TokenError::Invalid), "{token}");
        }
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(hex::decode(&hex::encode([0u8, 15, 255])), Some(vec![0, 15, 255]));
        assert_eq!(hex::decode("abc"), None);
    }
}
