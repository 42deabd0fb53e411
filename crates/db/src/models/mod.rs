//! Row models and write DTOs.

pub mod category;
pub mod listing;
pub mod media;
pub mod page;
pub mod post;
pub mod role;
pub mod session;
pub mod setting;
pub mod user;
