//! Authentication infrastructure module
//!
//! JWT access/refresh token management.

mod jwt;

pub use jwt::{TokenClaims, TokenConfig, TokenIssuer, TokenKind, TokenPair, TokenService};
