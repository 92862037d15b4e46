//! Energy Co-op Auth - Bearer token authentication and authorization
//!
//! This crate provides:
//! - JWT claims, principals and authorities
//! - Token verification by shared secret, PEM public key or JWKS
//! - The auth context handed to request handlers

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::*;
pub use service::auth::{JwtSettings, TokenVerifier, VerifyError};
