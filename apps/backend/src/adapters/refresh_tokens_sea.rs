//! SeaORM implementation of the refresh-token store.
//!
//! The `insert` unique-constraint semantics and idempotent deletes required
//! by the contract come straight from the table definition: the token string
//! is the primary key.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::refresh_tokens;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;
use crate::repos::refresh_tokens::{RefreshTokenRecord, RefreshTokenStore};

#[derive(Debug, Clone)]
pub struct RefreshTokenStoreSea {
    db: DatabaseConnection,
}

impl RefreshTokenStoreSea {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenStore for RefreshTokenStoreSea {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let active = refresh_tokens::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(OffsetDateTime::now_utc()),
        };

        active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let model = refresh_tokens::Entity::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(RefreshTokenRecord::from))
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), DomainError> {
        // rows_affected may be zero; absence is not an error
        refresh_tokens::Entity::delete_by_id(token.to_string())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<(), DomainError> {
        refresh_tokens::Entity::delete_many()
            .filter(refresh_tokens::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
