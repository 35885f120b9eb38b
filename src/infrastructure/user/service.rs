//! User service for registration and credential checks

use std::sync::Arc;

use crate::domain::user::{
    email_local_part, validate_email, validate_password, validate_username, User, UserId,
    UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: Option<String>,
    pub password: String,
}

/// User service for registration and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    ///
    /// Defaults the username to the email local-part when absent or blank.
    /// The check-then-create on email is backed by the repository's own
    /// uniqueness guard.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        validate_email(&request.email)
            .map_err(|e| DomainError::validation_field("email", e.to_string()))?;

        validate_password(&request.password)
            .map_err(|e| DomainError::validation_field("password", e.to_string()))?;

        let username = match request.username.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => email_local_part(&request.email).to_string(),
        };

        validate_username(&username)
            .map_err(|e| DomainError::validation_field("username", e.to_string()))?;

        if self.repository.exists_by_email(&request.email).await? {
            return Err(DomainError::validation_field(
                "email",
                "Email already registered.",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = User::new(&request.email, username, password_hash);

        self.repository.create(user).await
    }

    /// Authenticate a user with email and password
    ///
    /// Returns `None` for both an unknown email and a wrong password so the
    /// caller cannot distinguish the two cases.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = match UserId::parse(id) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        self.repository.find_by_id(&user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        UserService::new(repository, hasher)
    }

    fn make_request(email: &str, username: Option<&str>, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            username: username.map(|s| s.to_string()),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service
            .register(make_request("alice@example.com", Some("alice"), "secret1"))
            .await
            .unwrap();

        assert_eq!(user.email(), "alice@example.com");
        assert_eq!(user.username(), "alice");
        assert_ne!(user.password_hash(), "secret1");
    }

    #[tokio::test]
    async fn test_register_defaults_username_to_local_part() {
        let service = create_service();

        let user = service
            .register(make_request("alice@example.com", None, "secret1"))
            .await
            .unwrap();

        assert_eq!(user.username(), "alice");
    }

    #[tokio::test]
    async fn test_register_blank_username_defaults() {
        let service = create_service();

        let user = service
            .register(make_request("bob.smith@example.com", Some("  "), "secret1"))
            .await
            .unwrap();

        assert_eq!(user.username(), "bob.smith");
    }

    #[tokio::test]
    async fn test_register_short_password_fails() {
        let service = create_service();

        let result = service
            .register(make_request("alice@example.com", None, "12345"))
            .await;

        match result {
            Err(DomainError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("password"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // No record was created
        assert!(service.authenticate("alice@example.com", "12345").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_invalid_email_fails() {
        let service = create_service();

        let result = service
            .register(make_request("not-an-email", None, "secret1"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails() {
        let service = create_service();

        service
            .register(make_request("alice@example.com", None, "secret1"))
            .await
            .unwrap();

        let result = service
            .register(make_request("alice@example.com", Some("other"), "secret2"))
            .await;

        match result {
            Err(DomainError::Validation { field, message }) => {
                assert_eq!(field.as_deref(), Some("email"));
                assert_eq!(message, "Email already registered.");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();

        service
            .register(make_request("alice@example.com", None, "secret1"))
            .await
            .unwrap();

        let user = service
            .authenticate("alice@example.com", "secret1")
            .await
            .unwrap();

        assert!(user.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();

        service
            .register(make_request("alice@example.com", None, "secret1"))
            .await
            .unwrap();

        let user = service
            .authenticate("alice@example.com", "wrong_password")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_matches_wrong_password() {
        let service = create_service();

        service
            .register(make_request("alice@example.com", None, "secret1"))
            .await
            .unwrap();

        // Both failure modes are indistinguishable to the caller
        let wrong_password = service
            .authenticate("alice@example.com", "nope")
            .await
            .unwrap();
        let unknown_email = service
            .authenticate("nobody@example.com", "secret1")
            .await
            .unwrap();

        assert!(wrong_password.is_none());
        assert!(unknown_email.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let service = create_service();

        let user = service
            .register(make_request("alice@example.com", None, "secret1"))
            .await
            .unwrap();

        let found = service.get(&user.id().to_string()).await.unwrap();
        assert!(found.is_some());

        let missing = service.get("not-a-uuid").await.unwrap();
        assert!(missing.is_none());
    }
}
