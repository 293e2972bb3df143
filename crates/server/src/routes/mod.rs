// Copyright 2025 Alexandre D. Díaz
use std::sync::Arc;

use actix_web::web;
use sessiontoken::TokenService;

use crate::middlewares::auth::BearerAuth;

pub mod api;
pub mod auth;

/// Mounts every route. Both scopes sit behind the bearer gate; the admin
/// scope additionally requires an administrator level.
pub fn configure(cfg: &mut web::ServiceConfig, tokens: Arc<TokenService>) {
    cfg.service(
        web::scope(auth::PATH)
            .wrap(BearerAuth::new(tokens.clone()))
            .service(auth::route_refresh),
    )
    .service(
        web::scope(api::v1::PATH)
            .service(
                web::scope(api::v1::ADMIN_PATH)
                    .wrap(BearerAuth::new(tokens.clone()).min_level(sessiontoken::token::ADMIN_LEVEL))
                    .service(api::v1::user::route_save)
                    .service(api::v1::user::route_remove),
            )
            .service(api::v1::user::route_list)
            .service(api::v1::user::route_get)
            .wrap(BearerAuth::new(tokens)),
    );
}
