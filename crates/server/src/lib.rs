// Copyright 2025 Alexandre D. Díaz
pub mod config;
pub mod errors;
pub mod middlewares;
pub mod routes;
pub mod state;
