// Copyright 2025 Alexandre D. Díaz
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong secret, malformed token or inconsistent claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signature checks out but the validity window is over.
    #[error("token expired")]
    Expired,

    #[error("can't sign token: {0}")]
    Encoding(String),
}
