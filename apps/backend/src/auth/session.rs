//! Session orchestration: login, registration, per-request resolution,
//! logout and bulk revocation.
//!
//! Every operation is stateless apart from the injected stores and signing
//! config, so calls are freely concurrent across requests. The only ordering
//! subtlety is the refresh path: the store lookup and the subsequent mint are
//! read-then-act without a transaction, so a logout racing an in-flight
//! refresh may land just after the refresh succeeds. That window is accepted
//! by contract; deletes are idempotent and the minted access token still
//! expires on schedule.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::claims::Claims;
use crate::auth::jwt::{
    mint_access_token, mint_refresh_token, verify_access_token, verify_refresh_token,
    REFRESH_TTL_SECS,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::repos::refresh_tokens::RefreshTokenStore;
use crate::repos::users::{User, UserStore};
use crate::state::security_config::SecurityConfig;

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub claims: Claims,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of per-request session resolution.
///
/// When the access token was absent or stale and the refresh token carried
/// the request, `refreshed_access_token` holds the replacement the caller
/// must attach as a cookie. Resolution itself never mutates cookies.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub claims: Claims,
    pub refreshed_access_token: Option<String>,
}

/// Orchestrates the credential hasher, token codec and stores.
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    security: SecurityConfig,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            security,
        }
    }

    /// Authenticate by email and password and issue a token pair.
    ///
    /// Unknown email and wrong password both collapse into the same
    /// `InvalidCredentials` error; nothing in the response may reveal which
    /// precondition failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, AppError> {
        let user = self.users.find_by_email(email).await.map_err(AppError::from)?;

        let Some(user) = user else {
            debug!(email = %Redacted(email), "login for unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "login with wrong password");
            return Err(AppError::invalid_credentials());
        }

        let tokens = self.issue_tokens(&user).await?;
        info!(user_id = %user.id, "login succeeded");
        Ok(tokens)
    }

    /// Create a new account and issue a token pair, exactly as `login` would.
    /// A duplicate email surfaces as a conflict from the user store.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, AppError> {
        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(name, email, &password_hash)
            .await
            .map_err(AppError::from)?;

        let tokens = self.issue_tokens(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(tokens)
    }

    /// Resolve "who is calling" from the auth cookies.
    ///
    /// A valid access token answers immediately with zero store access; this
    /// is the fast path taken by nearly every request. Otherwise the refresh
    /// token is checked (signature first, then the store record), and on full
    /// success a fresh access token is minted for the caller to set as the
    /// replacement cookie. The refresh token itself is not rotated; it stays
    /// valid until its fixed expiry or logout.
    ///
    /// `Ok(None)` means "not authenticated" for any reason that is the
    /// client's fault; store failures propagate as errors.
    pub async fn resolve_current_user(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Option<ResolvedSession>, AppError> {
        if let Some(token) = access_token {
            if let Some(claims) = verify_access_token(token, &self.security) {
                return Ok(Some(ResolvedSession {
                    claims,
                    refreshed_access_token: None,
                }));
            }
        }

        let Some(token) = refresh_token else {
            return Ok(None);
        };

        // Signature check before touching the store: a forged token must not
        // cost I/O, and an invalid signature must not trigger any cleanup
        // (it may be tampering rather than expiry; revocation is the
        // caller's policy decision).
        let Some(claims) = verify_refresh_token(token, &self.security) else {
            debug!("refresh token failed signature verification");
            return Ok(None);
        };

        let record = self
            .refresh_tokens
            .find_by_token(token)
            .await
            .map_err(AppError::from)?;

        let Some(record) = record else {
            debug!(user_id = %claims.sub, "refresh token has no store record (revoked or never issued)");
            return Ok(None);
        };

        let now = OffsetDateTime::now_utc();
        if record.is_expired(now) {
            // Lazy cleanup; best effort, the session is over either way.
            if let Err(e) = self.refresh_tokens.delete_by_token(token).await {
                warn!(user_id = %record.user_id, error = %e, "failed to delete expired refresh token");
            }
            debug!(user_id = %record.user_id, "refresh token record expired");
            return Ok(None);
        }

        let refreshed =
            mint_access_token(&claims.sub, &claims.email, now, &self.security)?;
        debug!(user_id = %claims.sub, "access token refreshed");

        Ok(Some(ResolvedSession {
            claims,
            refreshed_access_token: Some(refreshed),
        }))
    }

    /// End the session behind this refresh token. Always idempotent: an
    /// absent, invalid or already-deleted token is still a successful logout.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = refresh_token {
            self.refresh_tokens
                .delete_by_token(token)
                .await
                .map_err(AppError::from)?;
            debug!("refresh token revoked on logout");
        }
        Ok(())
    }

    /// Revoke every refresh token for the user ("log out everywhere"), e.g.
    /// after a password change or a security event.
    pub async fn revoke_all_sessions(&self, user_id: uuid::Uuid) -> Result<(), AppError> {
        self.refresh_tokens
            .delete_all_for_user(user_id)
            .await
            .map_err(AppError::from)?;
        info!(user_id = %user_id, "all sessions revoked");
        Ok(())
    }

    /// Mint the token pair and persist the refresh record. This is the only
    /// path that creates a refresh-token store record.
    async fn issue_tokens(&self, user: &User) -> Result<AuthTokens, AppError> {
        let sub = user.id.to_string();
        let now = OffsetDateTime::now_utc();

        let access_token = mint_access_token(&sub, &user.email, now, &self.security)?;
        let mut refresh_token = mint_refresh_token(&sub, &user.email, now, &self.security)?;
        let expires_at = now + Duration::seconds(REFRESH_TTL_SECS);

        if let Err(e) = self
            .refresh_tokens
            .insert(&refresh_token, user.id, expires_at)
            .await
        {
            if !e.is_token_conflict() {
                return Err(AppError::from(e));
            }
            // The jti makes an identical token string essentially impossible,
            // but the unique constraint is still handled: regenerate once.
            warn!(user_id = %user.id, "refresh token string collision, regenerating");
            refresh_token = mint_refresh_token(&sub, &user.email, now, &self.security)?;
            self.refresh_tokens
                .insert(&refresh_token, user.id, expires_at)
                .await
                .map_err(AppError::from)?;
        }

        let claims = verify_access_token(&access_token, &self.security)
            .ok_or_else(|| AppError::internal("freshly minted access token failed verification"))?;

        Ok(AuthTokens {
            claims,
            access_token,
            refresh_token,
        })
    }
}
