//! In-memory store implementations with call counters.
//!
//! These back the session-service and endpoint tests: they honor the same
//! contracts as the SeaORM adapters (unique email, unique token string,
//! idempotent deletes) and count every call so tests can assert which paths
//! touched a store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::refresh_tokens::{RefreshTokenRecord, RefreshTokenStore};
use crate::repos::users::{User, UserStore};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    pub find_by_email_calls: AtomicUsize,
    pub find_by_id_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user directly, bypassing the trait and its counters.
    pub fn seed(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn total_calls(&self) -> usize {
        self.find_by_email_calls.load(Ordering::SeqCst)
            + self.find_by_id_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_by_email_calls.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DomainError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueEmail,
                "Email already registered",
            ));
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: Mutex<HashMap<String, RefreshTokenRecord>>,
    pub insert_calls: AtomicUsize,
    pub find_by_token_calls: AtomicUsize,
    pub delete_by_token_calls: AtomicUsize,
    pub delete_all_for_user_calls: AtomicUsize,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the trait and its counters.
    pub fn seed(&self, record: RefreshTokenRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.token.clone(), record);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.records.lock().unwrap().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
            + self.find_by_token_calls.load(Ordering::SeqCst)
            + self.delete_by_token_calls.load(Ordering::SeqCst)
            + self.delete_all_for_user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(token) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueToken,
                "refresh token already stored",
            ));
        }
        records.insert(
            token.to_string(),
            RefreshTokenRecord {
                token: token.to_string(),
                user_id,
                expires_at,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.find_by_token_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), DomainError> {
        self.delete_by_token_calls.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().remove(token);
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.delete_all_for_user_calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .retain(|_, record| record.user_id != user_id);
        Ok(())
    }
}
