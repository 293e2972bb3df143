// Copyright 2025 Alexandre D. Díaz
pub mod user;

pub static PATH: &str = "/api/v1";
pub static ADMIN_PATH: &str = "/admin";
