// Copyright 2025 Alexandre D. Díaz
pub mod v1;
