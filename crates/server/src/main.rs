// Copyright 2025 Alexandre D. Díaz
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    http::{header, StatusCode},
    middleware::{ErrorHandlers, Logger},
    web, App, HttpServer,
};

use recordstore::{models, RecordMapper};
use server::config::ServerConfig;
use server::middlewares::not_found;
use server::routes;
use server::state::AppState;
use sessiontoken::TokenService;

fn io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = Arc::new(ServerConfig::new().map_err(io_error)?);

    // connect to SQLite DB
    let mapper = RecordMapper::open(&server_config.store_config()).map_err(io_error)?;
    models::prepare_schema(mapper.gateway()).map_err(io_error)?;

    let tokens = Arc::new(TokenService::new(&server_config.token_config()));
    let state = web::Data::new(AppState {
        mapper,
        tokens: tokens.clone(),
    });

    log::info!(
        "starting HTTP server at http://{}:{}",
        server_config.get_bind_address(),
        server_config.get_port()
    );

    let app_state = state.clone();
    let app_config = server_config.clone();
    HttpServer::new(move || {
        let cors_config = app_config.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                cors_config.is_allowed_origin(origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
            .max_age(3600);
        let tokens = tokens.clone();

        App::new()
            .app_data(app_state.clone())
            .configure(move |cfg| routes::configure(cfg, tokens))
            .wrap(cors)
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found::handler_fn))
            .wrap(Logger::default())
    })
    .bind((server_config.get_bind_address().clone(), *server_config.get_port()))?
    .workers(*server_config.get_workers())
    .run()
    .await?;

    match Arc::try_unwrap(state.into_inner()) {
        Ok(state) => state.mapper.close(),
        Err(_) => log::warn!("database pool still shared at shutdown, leaving it to drop"),
    }
    Ok(())
}
