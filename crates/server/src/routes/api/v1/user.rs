// Copyright 2025 Alexandre D. Díaz
use actix_web::{delete, get, post, web, HttpResponse};
use recordstore::models::user::{self, User};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RouteListRequest {
    q: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

#[get("/users")]
pub async fn route_list(
    state: web::Data<AppState>,
    info: web::Query<RouteListRequest>,
) -> Result<HttpResponse, ApiError> {
    let keyword = info.into_inner().q.unwrap_or_default();
    let users = web::block(move || user::search(&state.mapper, &keyword)).await??;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/{id}")]
pub async fn route_get(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let found = web::block(move || state.mapper.load::<User>(id)).await??;
    match found {
        Some(found) => Ok(HttpResponse::Ok().json(found)),
        None => Err(ApiError::Data(recordstore::DataError::NotFound {
            table: user::TABLE_NAME.to_string(),
            field: "id".to_string(),
        })),
    }
}

/// Creates the user when the body has no id (or id 0), updates it otherwise.
#[post("/users")]
pub async fn route_save(
    state: web::Data<AppState>,
    body: web::Json<User>,
) -> Result<HttpResponse, ApiError> {
    let mut record = body.into_inner();
    if record.username.trim().is_empty() {
        return Err(ApiError::BadRequest("username can't be empty".to_string()));
    }
    let saved = web::block(move || state.mapper.save(&mut record).map(|_| record)).await??;
    log::info!("user '{}' saved as #{}", &saved.username, saved.id);
    Ok(HttpResponse::Ok().json(saved))
}

#[delete("/users/{id}")]
pub async fn route_remove(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let removed = web::block(move || match state.mapper.load::<User>(id)? {
        Some(found) => state.mapper.remove(&found),
        None => Ok(false),
    })
    .await??;
    Ok(HttpResponse::Ok().json(RemoveResponse { removed }))
}
