//! Identity claims carried inside both token domains.

use serde::{Deserialize, Serialize};

/// Claims included in backend-issued tokens. Access and refresh tokens carry
/// the identical shape so either can re-derive "who is calling".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User identifier (users.id as a string)
    pub sub: String,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Unique token id; makes every minted token string globally unique
    pub jti: String,
}
