// Copyright 2025 Alexandre D. Díaz
//! Bearer token gate.
//!
//! Requests without a usable `Authorization: Bearer <token>` header are
//! answered with 401 right here; the reason (missing, invalid or expired)
//! is spelled out in the body. Accepted requests carry their [`Claims`] in
//! the request extensions, readable with `web::ReqData<Claims>`.
use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use sessiontoken::{Claims, TokenError, TokenService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    NotAuthorized,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingToken => "Token required",
            Rejection::InvalidToken => "Invalid token",
            Rejection::ExpiredToken => "Token expired",
            Rejection::NotAuthorized => "Not authorized",
        }
    }

    pub fn response(&self) -> HttpResponse {
        let mut builder = match self {
            Rejection::NotAuthorized => HttpResponse::Forbidden(),
            _ => HttpResponse::Unauthorized(),
        };
        builder.json(json!({
            "status": "Unauthorized",
            "message": self.message(),
        }))
    }
}

/// Decides what to do with the `Authorization` header of a request.
pub fn authorize(
    header: Option<&HeaderValue>,
    tokens: &TokenService,
    min_level: Option<i64>,
) -> Result<Claims, Rejection> {
    let header = header.ok_or(Rejection::MissingToken)?;
    let raw = header.to_str().map_err(|_| Rejection::InvalidToken)?;
    let token = raw
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(Rejection::InvalidToken)?;
    let claims = tokens.verify(token).map_err(|err| match err {
        TokenError::Expired => Rejection::ExpiredToken,
        err => {
            log::debug!("rejected token: {}", err);
            Rejection::InvalidToken
        }
    })?;
    check_level(&claims, min_level)?;
    Ok(claims)
}

fn check_level(claims: &Claims, min_level: Option<i64>) -> Result<(), Rejection> {
    match min_level {
        Some(level) if claims.level < level => Err(Rejection::NotAuthorized),
        _ => Ok(()),
    }
}

pub struct BearerAuth {
    tokens: Arc<TokenService>,
    min_level: Option<i64>,
}

impl BearerAuth {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            min_level: None,
        }
    }

    /// Also answer 403 to subjects below `level`.
    pub fn min_level(mut self, level: i64) -> Self {
        self.min_level = Some(level);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service,
            tokens: self.tokens.clone(),
            min_level: self.min_level,
        }))
    }
}

pub struct BearerAuthService<S> {
    service: S,
    tokens: Arc<TokenService>,
    min_level: Option<i64>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // An outer gate may already have verified this request.
        let known = req.extensions().get::<Claims>().cloned();
        let verdict = match known {
            Some(claims) => check_level(&claims, self.min_level).map(|_| claims),
            None => authorize(req.headers().get(AUTHORIZATION), &self.tokens, self.min_level),
        };

        match verdict {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => {
                log::warn!(
                    "{} {} rejected: {}",
                    req.method(),
                    req.path(),
                    rejection.message()
                );
                let (req, _) = req.into_parts();
                let res = rejection.response().map_into_right_body();
                Box::pin(async move { Ok(ServiceResponse::new(req, res)) })
            }
        }
    }
}
