//! Token codec: minting and verification for the two signing domains.
//!
//! Access tokens are short-lived and purely cryptographic; refresh tokens are
//! longer-lived and additionally backed by a store record (enforced in the
//! session layer, not here). Domain separation comes from verifying only
//! against the matching secret.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;
use tracing::debug;

use crate::auth::claims::Claims;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Access tokens live for 15 minutes.
pub const ACCESS_TTL_SECS: i64 = 15 * 60;
/// Refresh tokens live for 7 days.
pub const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

fn mint(
    sub: &str,
    email: &str,
    now: OffsetDateTime,
    ttl_secs: i64,
    secret: &[u8],
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now.unix_timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        iat,
        exp: iat + ttl_secs,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature and expiry against one signing domain.
///
/// Any structural, signature, or expiry failure reduces to `None`; "could not
/// verify" is never an error across this boundary.
fn verify(token: &str, secret: &[u8], security: &SecurityConfig) -> Option<Claims> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    match decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            let reason = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "token_expired",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "invalid_signature",
                _ => "invalid_token",
            };
            debug!(reason, "token verification failed");
            None
        }
    }
}

/// Mint a HS256 access token with a 15-minute TTL.
pub fn mint_access_token(
    sub: &str,
    email: &str,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    mint(
        sub,
        email,
        now,
        ACCESS_TTL_SECS,
        &security.access_secret,
        security,
    )
}

/// Mint a HS256 refresh token with a 7-day TTL.
pub fn mint_refresh_token(
    sub: &str,
    email: &str,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    mint(
        sub,
        email,
        now,
        REFRESH_TTL_SECS,
        &security.refresh_secret,
        security,
    )
}

/// Verify a token against the access-domain secret.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Option<Claims> {
    verify(token, &security.access_secret, security)
}

/// Verify a token against the refresh-domain secret. Signature and expiry
/// only; the store record is the session layer's concern.
pub fn verify_refresh_token(token: &str, security: &SecurityConfig) -> Option<Claims> {
    verify(token, &security.refresh_secret, security)
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;

    fn test_security() -> SecurityConfig {
        SecurityConfig::new("access_secret_for_codec_tests", "refresh_secret_for_codec_tests")
    }

    #[test]
    fn mint_and_verify_roundtrip() {
        let security = test_security();
        let now = OffsetDateTime::now_utc();

        let token = mint_access_token("user-123", "test@example.com", now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.iat, now.unix_timestamp());
        assert_eq!(claims.exp, claims.iat + ACCESS_TTL_SECS);
    }

    #[test]
    fn expired_access_token_fails() {
        let security = test_security();
        // 20 minutes ago so the 15-minute token is expired
        let now = OffsetDateTime::now_utc() - Duration::minutes(20);

        let token = mint_access_token("user-456", "test@example.com", now, &security).unwrap();
        assert!(verify_access_token(&token, &security).is_none());
    }

    #[test]
    fn signing_domains_never_cross_verify() {
        let security = test_security();
        let now = OffsetDateTime::now_utc();

        let access = mint_access_token("u1", "a@x.com", now, &security).unwrap();
        let refresh = mint_refresh_token("u1", "a@x.com", now, &security).unwrap();

        assert!(verify_access_token(&access, &security).is_some());
        assert!(verify_refresh_token(&refresh, &security).is_some());

        assert!(verify_refresh_token(&access, &security).is_none());
        assert!(verify_access_token(&refresh, &security).is_none());
    }

    #[test]
    fn refresh_ttl_is_seven_days() {
        let security = test_security();
        let now = OffsetDateTime::now_utc();

        let token = mint_refresh_token("u1", "a@x.com", now, &security).unwrap();
        let claims = verify_refresh_token(&token, &security).unwrap();
        assert_eq!(claims.exp - claims.iat, REFRESH_TTL_SECS);
    }

    #[test]
    fn garbage_input_reduces_to_none() {
        let security = test_security();
        assert!(verify_access_token("", &security).is_none());
        assert!(verify_access_token("not-a-jwt", &security).is_none());
        assert!(verify_access_token("a.b.c", &security).is_none());
    }

    #[test]
    fn wrong_secret_fails() {
        let security_a = test_security();
        let security_b = SecurityConfig::new("other_access_secret", "other_refresh_secret");
        let now = OffsetDateTime::now_utc();

        let token = mint_access_token("u1", "a@x.com", now, &security_a).unwrap();
        assert!(verify_access_token(&token, &security_b).is_none());
    }
}
