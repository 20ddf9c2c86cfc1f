use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::adapters::{RefreshTokenStoreSea, UserStoreSea};
use crate::auth::session::SessionService;
use crate::repos::refresh_tokens::RefreshTokenStore;
use crate::repos::users::UserStore;

use super::security_config::SecurityConfig;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent when the state is built on bare stores,
    /// e.g. in tests)
    pub db: Option<DatabaseConnection>,
    /// Signing configuration
    pub security: SecurityConfig,
    /// Session orchestration over the user and refresh-token stores
    pub sessions: SessionService,
}

impl AppState {
    /// Build state backed by SeaORM stores over the given connection.
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        let users = Arc::new(UserStoreSea::new(db.clone()));
        let refresh_tokens = Arc::new(RefreshTokenStoreSea::new(db.clone()));
        Self::with_stores(Some(db), security, users, refresh_tokens)
    }

    /// Build state on explicit store implementations. This is how tests
    /// inject in-memory stores.
    pub fn with_stores(
        db: Option<DatabaseConnection>,
        security: SecurityConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        let sessions = SessionService::new(users, refresh_tokens, security.clone());
        Self {
            db,
            security,
            sessions,
        }
    }

    /// Database connection or an internal error when running without one.
    pub fn require_db(&self) -> Result<&DatabaseConnection, crate::error::AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| crate::error::AppError::internal("Database connection not available"))
    }
}
