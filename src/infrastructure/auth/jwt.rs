//! JWT access/refresh token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::User;
use crate::domain::DomainError;

/// Which half of a token pair a JWT represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email address
    pub email: String,
    /// Token use discriminator; an access token is never a valid refresh
    /// token and vice versa
    pub token_use: TokenKind,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Create new claims for a user
    pub fn new(user: &User, kind: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            token_use: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// A freshly minted access/refresh token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: u64,
    /// Refresh token lifetime in days
    pub refresh_ttl_days: u64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, access_ttl_minutes: u64, refresh_ttl_days: u64) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_minutes,
            refresh_ttl_days,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_ttl_minutes: 5,
            refresh_ttl_days: 1,
        }
    }
}

/// Trait for token operations
pub trait TokenIssuer: Send + Sync + Debug {
    /// Mint an access/refresh pair bound to a user
    fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError>;

    /// Mint a single access token (refresh flow)
    fn issue_access(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a token of the expected kind and return its claims
    fn decode(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, DomainError>;
}

/// HS256 token service backed by a shared secret
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl_minutes", &self.config.access_ttl_minutes)
            .field("refresh_ttl_days", &self.config.refresh_ttl_days)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    /// Create a new token service with the given configuration
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, DomainError> {
        let ttl = match kind {
            TokenKind::Access => Duration::minutes(self.config.access_ttl_minutes as i64),
            TokenKind::Refresh => Duration::days(self.config.refresh_ttl_days as i64),
        };

        let claims = TokenClaims::new(user, kind, ttl);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }
}

impl TokenIssuer for TokenService {
    fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        Ok(TokenPair {
            access: self.issue(user, TokenKind::Access)?,
            refresh: self.issue(user, TokenKind::Refresh)?,
        })
    }

    fn issue_access(&self, user: &User) -> Result<String, DomainError> {
        self.issue(user, TokenKind::Access)
    }

    fn decode(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, DomainError> {
        let validation = Validation::default();

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| DomainError::Credential)?;

        if token_data.claims.token_use != expected {
            return Err(DomainError::Credential);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new("alice@example.com", "alice", "hashed_password")
    }

    fn create_service() -> TokenService {
        TokenService::new(TokenConfig::new("test-secret-key-12345", 5, 1))
    }

    #[test]
    fn test_issue_pair_and_decode() {
        let service = create_service();
        let user = create_test_user();

        let pair = service.issue_pair(&user).unwrap();
        assert!(!pair.access.is_empty());
        assert!(!pair.refresh.is_empty());
        assert_ne!(pair.access, pair.refresh);

        let access = service.decode(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(access.sub, user.id().to_string());
        assert_eq!(access.email, "alice@example.com");

        let refresh = service.decode(&pair.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.sub, user.id().to_string());
    }

    #[test]
    fn test_token_kind_mismatch_rejected() {
        let service = create_service();
        let user = create_test_user();

        let pair = service.issue_pair(&user).unwrap();

        assert!(service.decode(&pair.refresh, TokenKind::Access).is_err());
        assert!(service.decode(&pair.access, TokenKind::Refresh).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        let result = service.decode("invalid-token", TokenKind::Access);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = TokenService::new(TokenConfig::new("secret-1", 5, 1));
        let service2 = TokenService::new(TokenConfig::new("secret-2", 5, 1));

        let user = create_test_user();
        let pair = service1.issue_pair(&user).unwrap();

        // Token signed with a different secret must fail validation
        let result = service2.decode(&pair.access, TokenKind::Access);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = create_service();
        let user = create_test_user();

        // Hand-craft claims that expired an hour ago
        let past_time = Utc::now() - Duration::hours(1);
        let claims = TokenClaims {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            token_use: TokenKind::Access,
            iat: (past_time - Duration::hours(2)).timestamp(),
            exp: past_time.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        let result = service.decode(&token, TokenKind::Access);
        assert!(result.is_err());
    }

    #[test]
    fn test_issue_access() {
        let service = create_service();
        let user = create_test_user();

        let access = service.issue_access(&user).unwrap();
        let claims = service.decode(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.token_use, TokenKind::Access);
    }

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert_eq!(config.access_ttl_minutes, 5);
        assert_eq!(config.refresh_ttl_days, 1);
    }
}
