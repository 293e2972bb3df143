// Copyright 2025 Alexandre D. Díaz
//! Signed, time-limited session tokens (HS256 JWT).
pub mod error;
pub mod token;

pub use error::TokenError;
pub use token::{Claims, Identity, TokenConfig, TokenService, ValidityWindow};
