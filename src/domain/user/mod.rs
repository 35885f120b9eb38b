//! User domain module

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    email_local_part, validate_email, validate_password, validate_username, UserValidationError,
};
