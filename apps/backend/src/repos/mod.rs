//! Domain repositories: store contracts and models, free of HTTP concerns.

pub mod refresh_tokens;
pub mod tasks;
pub mod users;
