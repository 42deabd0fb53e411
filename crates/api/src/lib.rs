//! HTTP layer of the Folio headless CMS.
//!
//! Exposes the router builder and its building blocks so the binary and the
//! integration tests assemble the same application.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
