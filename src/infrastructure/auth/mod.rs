//! Authentication infrastructure module
//!
//! JWT session tokens bound to a user's email.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService, INVALID_TOKEN};
