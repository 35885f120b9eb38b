//! User infrastructure module
//!
//! Implementations for registration and credential checks: Argon2 password
//! hashing, in-memory and PostgreSQL repositories, and the user service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{RegisterUserRequest, UserService};
