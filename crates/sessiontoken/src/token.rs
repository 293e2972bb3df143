// Copyright 2025 Alexandre D. Díaz
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Permission level from which a subject counts as an administrator.
pub const ADMIN_LEVEL: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityWindow {
    /// One hour.
    Short,
    /// Twenty-four hours.
    Long,
    Custom(Duration),
}

impl ValidityWindow {
    pub fn duration(&self) -> Duration {
        match self {
            ValidityWindow::Short => Duration::hours(1),
            ValidityWindow::Long => Duration::hours(24),
            ValidityWindow::Custom(duration) => *duration,
        }
    }

    /// `"short"`/`"1h"` and `"long"`/`"24h"`, or a number of seconds.
    pub fn parse(raw: &str) -> Option<ValidityWindow> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" | "1h" => Some(ValidityWindow::Short),
            "long" | "24h" => Some(ValidityWindow::Long),
            other => other
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(|secs| ValidityWindow::Custom(Duration::seconds(secs))),
        }
    }
}

/// Who a token speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub level: i64,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub level: i64,
    pub iat: i64,
    /// Expiry checked by the JWT validation, unix seconds.
    pub exp: i64,
    /// Same instant as `exp`, kept for consumers that read the payload directly.
    pub expire_at: DateTime<Utc>,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub,
            name: self.name.clone(),
            level: self.level,
        }
    }

    /// Compares the expiry with the clock only. The signature was checked when decoding.
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expire_at
    }

    pub fn is_admin(&self) -> bool {
        self.level >= ADMIN_LEVEL
    }
}

#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub window: ValidityWindow,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"***")
            .field("window", &self.window)
            .finish()
    }
}

/// Issues and verifies tokens with one symmetric secret, fixed at construction.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    window: ValidityWindow,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> TokenService {
        if config.secret.is_empty() {
            log::warn!("token secret is empty, tokens can be forged by anyone");
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        TokenService {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            window: config.window,
        }
    }

    pub fn default_window(&self) -> ValidityWindow {
        self.window
    }

    /// Signs a new token expiring `window` from now.
    pub fn issue(&self, identity: &Identity, window: ValidityWindow) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let exp = now + window.duration().num_seconds();
        let expire_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| TokenError::Encoding(format!("expiry out of range: {}", exp)))?;
        let claims = Claims {
            sub: identity.id,
            name: identity.name.clone(),
            level: identity.level,
            iat: now,
            exp,
            expire_at,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Encoding(err.to_string()))
    }

    pub fn issue_default(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue(identity, self.window)
    }

    /// New token for the same identity with a fresh expiry. The old token is untouched.
    pub fn reissue(&self, claims: &Claims, window: ValidityWindow) -> Result<String, TokenError> {
        self.issue(&claims.identity(), window)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err.to_string()),
            }
        })?;
        let claims = data.claims;
        if claims.expire_at.timestamp() != claims.exp {
            return Err(TokenError::Invalid("expiry fields disagree".to_string()));
        }
        // jsonwebtoken still accepts `exp == now`
        if !claims.is_valid() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
