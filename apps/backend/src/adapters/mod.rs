//! SeaORM implementations of the store contracts in `crate::repos`.

pub mod refresh_tokens_sea;
pub mod users_sea;

pub use refresh_tokens_sea::RefreshTokenStoreSea;
pub use users_sea::UserStoreSea;
