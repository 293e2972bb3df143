// Copyright 2025 Alexandre D. Díaz
#![allow(dead_code)]
use std::time::Duration;

use recordstore::models;
use recordstore::{RecordMapper, StoreConfig};
use tempfile::TempDir;

/// Mapper over a fresh SQLite file; the directory lives as long as the returned guard.
pub fn open_store(pool_size: u32) -> (TempDir, RecordMapper) {
    let (dir, mapper) = open_bare_store(pool_size);
    models::prepare_schema(mapper.gateway()).expect("schema");
    (dir, mapper)
}

/// Same as [`open_store`] without any table.
pub fn open_bare_store(pool_size: u32) -> (TempDir, RecordMapper) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("store.db");
    let config = StoreConfig::new(db_path.to_str().expect("utf-8 path"))
        .with_pool_max_size(pool_size)
        .with_connection_timeout(Duration::from_secs(10));
    let mapper = RecordMapper::open(&config).expect("open store");
    (dir, mapper)
}
