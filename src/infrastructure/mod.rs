//! Infrastructure layer - concrete implementations of domain collaborators

pub mod auth;
pub mod logging;
pub mod notification;
pub mod user;
