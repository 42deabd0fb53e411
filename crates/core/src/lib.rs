//! Domain building blocks for the Folio CMS.
//!
//! Everything in this crate is free of I/O so that the repository layer,
//! the HTTP layer and tests can share the same rules.

pub mod content;
pub mod error;
pub mod media;
pub mod pagination;
pub mod settings;
pub mod slug;
pub mod tokens;
pub mod types;
