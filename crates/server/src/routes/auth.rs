// Copyright 2025 Alexandre D. Díaz
use actix_web::{post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sessiontoken::{Claims, ValidityWindow};

use crate::errors::ApiError;
use crate::state::AppState;

pub static PATH: &str = "/auth";

#[derive(Debug, Deserialize)]
pub struct RouteRefreshRequest {
    window: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expire_at: DateTime<Utc>,
}

/// Trades a still valid token for a new one with a fresh expiry.
#[post("/refresh")]
pub async fn route_refresh(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    info: web::Query<RouteRefreshRequest>,
) -> Result<HttpResponse, ApiError> {
    let window = match &info.window {
        Some(raw) => ValidityWindow::parse(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown validity window '{}'", raw)))?,
        None => state.tokens.default_window(),
    };
    let token = state.tokens.reissue(&claims.into_inner(), window)?;
    let renewed = state.tokens.verify(&token)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        expire_at: renewed.expire_at,
    }))
}
