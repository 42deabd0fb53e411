//! HTTP handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod media;
pub mod pages;
pub mod posts;
pub mod roles;
pub mod settings;
pub mod users;
