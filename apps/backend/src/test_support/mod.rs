//! Test-only helpers shared by unit and integration tests.
//!
//! Compiled into the library so integration tests under `tests/` can build
//! app state on in-memory stores without a database.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::repos::users::User;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

pub mod memory;

pub use memory::{InMemoryRefreshTokenStore, InMemoryUserStore};

/// App state on in-memory stores, returned alongside the store handles so
/// tests can seed records and read call counters.
pub fn memory_state(
    security: SecurityConfig,
) -> (
    AppState,
    Arc<InMemoryUserStore>,
    Arc<InMemoryRefreshTokenStore>,
) {
    let users = Arc::new(InMemoryUserStore::new());
    let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let state = AppState::with_stores(
        None,
        security,
        users.clone(),
        refresh_tokens.clone(),
    );
    (state, users, refresh_tokens)
}

/// Seed a user with a real Argon2 hash of `password` and return it.
pub fn seed_user(store: &InMemoryUserStore, name: &str, email: &str, password: &str) -> User {
    let now = time::OffsetDateTime::now_utc();
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password).expect("hashing cannot fail on valid input"),
        created_at: now,
        updated_at: now,
    };
    store.seed(user.clone());
    user
}
