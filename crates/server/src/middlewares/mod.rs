// Copyright 2025 Alexandre D. Díaz
pub mod auth;
pub mod not_found;
