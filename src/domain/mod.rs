//! Domain layer - core entities and business rules

pub mod error;
pub mod user;

pub use error::DomainError;
