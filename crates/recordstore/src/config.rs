// Copyright 2025 Alexandre D. Díaz
use std::time::Duration;

pub static DEFAULT_AUDIT_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Everything the store needs at startup. Built once by the caller and
/// handed to [`crate::RecordMapper::open`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: String,
    pub pool_max_size: u32,
    /// How long a caller waits for a free connection before giving up.
    pub connection_timeout: Duration,
    pub busy_timeout: Duration,
    /// Seconds a table's column list stays cached. `0` re-reads it every call.
    pub schema_cache_ttl: u64,
    pub sniff_json_arrays: bool,
    pub audit_columns: Vec<String>,
}

impl StoreConfig {
    pub fn new(db_path: &str) -> StoreConfig {
        StoreConfig {
            db_path: db_path.to_string(),
            ..StoreConfig::default()
        }
    }

    pub fn with_pool_max_size(mut self, pool_max_size: u32) -> StoreConfig {
        self.pool_max_size = pool_max_size;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> StoreConfig {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_schema_cache_ttl(mut self, ttl: u64) -> StoreConfig {
        self.schema_cache_ttl = ttl;
        self
    }

    pub fn with_sniff_json_arrays(mut self, enabled: bool) -> StoreConfig {
        self.sniff_json_arrays = enabled;
        self
    }

    pub fn with_audit_columns(mut self, columns: &[&str]) -> StoreConfig {
        self.audit_columns = columns.iter().map(|x| x.to_string()).collect();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            db_path: "data/data.db".to_string(),
            pool_max_size: 15,
            connection_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            schema_cache_ttl: 3600,
            sniff_json_arrays: true,
            audit_columns: DEFAULT_AUDIT_COLUMNS.iter().map(|x| x.to_string()).collect(),
        }
    }
}
