//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- opaque session tokens, their digests and configuration.
//! - [`cookies`] -- session and CSRF cookie builders.

pub mod cookies;
pub mod password;
pub mod session;
