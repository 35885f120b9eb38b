//! User input validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_USERNAME_LENGTH: usize = 150;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 254 characters
/// - Exactly one `@` with a non-empty local-part and a domain containing a dot
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(UserValidationError::InvalidEmail);
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(UserValidationError::InvalidEmail);
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a username
///
/// Rules:
/// - Maximum 150 characters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 6 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// The portion of an email address before the `@` symbol.
///
/// Used to default the username when registration omits one.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Email tests
    #[test]
    fn test_valid_emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
    }

    #[test]
    fn test_email_missing_at() {
        assert_eq!(
            validate_email("alice.example.com"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_empty_local_part() {
        assert_eq!(
            validate_email("@example.com"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_bad_domain() {
        assert_eq!(
            validate_email("alice@localhost"),
            Err(UserValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email("alice@.com"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_with_whitespace() {
        assert_eq!(
            validate_email("alice smith@example.com"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_too_long() {
        let long_email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&long_email),
            Err(UserValidationError::EmailTooLong(254))
        );
    }

    // Username tests
    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_ok()); // blank is defaulted upstream
    }

    #[test]
    fn test_username_too_long() {
        let long_username = "a".repeat(151);
        assert_eq!(
            validate_username(&long_username),
            Err(UserValidationError::UsernameTooLong(150))
        );
    }

    // Password tests
    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("P@ssw0rd!").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("12345"),
            Err(UserValidationError::PasswordTooShort(6))
        );
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(129);
        assert_eq!(
            validate_password(&long_password),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }

    // Local-part tests
    #[test]
    fn test_email_local_part() {
        assert_eq!(email_local_part("alice@example.com"), "alice");
        assert_eq!(email_local_part("bob.smith@example.com"), "bob.smith");
    }
}
