//! Refresh-token store contract and domain model.
//!
//! A refresh token is valid only while its signature verifies AND a row with
//! that exact token string exists AND the row is unexpired. The row is what
//! makes server-side revocation possible; a signature alone cannot be
//! revoked.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::domain::DomainError;

/// Durable record of an issued refresh token, keyed by the token string.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Store contract for refresh-token records.
///
/// `insert` must have unique-constraint semantics on the token string;
/// deletes are commutative and idempotent, so no locking is needed under
/// concurrent duplicate calls.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a newly issued token. An existing row with the same token
    /// string surfaces as `DomainError::Conflict(ConflictKind::UniqueToken, _)`.
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError>;

    async fn find_by_token(&self, token: &str)
        -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Delete the record for this token. No-op when absent.
    async fn delete_by_token(&self, token: &str) -> Result<(), DomainError>;

    /// Bulk revoke: delete every record belonging to the user ("log out
    /// everywhere").
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<(), DomainError>;
}

impl From<crate::entities::refresh_tokens::Model> for RefreshTokenRecord {
    fn from(model: crate::entities::refresh_tokens::Model) -> Self {
        Self {
            token: model.token,
            user_id: model.user_id,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}
