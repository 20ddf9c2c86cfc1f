//! SeaORM entities mirroring the schema in `packages/migration`.

pub mod refresh_tokens;
pub mod tasks;
pub mod users;
