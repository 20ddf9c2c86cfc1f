//! Authentication core: credential hashing, the token codec, cookie policy
//! and session orchestration.

pub mod claims;
pub mod cookies;
pub mod jwt;
pub mod password;
pub mod session;
