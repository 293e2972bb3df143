// Copyright 2025 Alexandre D. Díaz
use std::sync::Mutex;

use cached::{Cached, TimedSizedCache};

use crate::coercion::ColumnKind;
use crate::config::StoreConfig;
use crate::error::{DataError, Result};
use crate::gateway::Gateway;
use crate::value::Value;

const CACHE_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

/// Discovers the writable columns of a table.
///
/// Audit columns are maintained by the database and never show up here.
pub struct SchemaIntrospector {
    audit_columns: Vec<String>,
    cache: Option<Mutex<TimedSizedCache<String, Vec<ColumnDescriptor>>>>,
}

impl SchemaIntrospector {
    pub fn new(audit_columns: Vec<String>, cache_ttl: u64) -> SchemaIntrospector {
        let cache = if cache_ttl == 0 {
            None
        } else {
            Some(Mutex::new(TimedSizedCache::with_size_and_lifespan(
                CACHE_SIZE, cache_ttl,
            )))
        };
        SchemaIntrospector {
            audit_columns,
            cache,
        }
    }

    pub fn from_config(config: &StoreConfig) -> SchemaIntrospector {
        SchemaIntrospector::new(config.audit_columns.clone(), config.schema_cache_ttl)
    }

    /// Columns of `table` in physical order, audit columns removed.
    pub fn columns_of(&self, gateway: &Gateway, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let key = table.to_string();
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                if let Some(columns) = cache.cache_get(&key) {
                    return Ok(columns.clone());
                }
            }
        }
        let columns = self.describe(gateway, table)?;
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.cache_set(key, columns.clone());
            }
        }
        Ok(columns)
    }

    pub fn column_names_of(&self, gateway: &Gateway, table: &str) -> Result<Vec<String>> {
        Ok(self
            .columns_of(gateway, table)?
            .into_iter()
            .map(|col| col.name)
            .collect())
    }

    /// Forgets the cached column list of `table`.
    pub fn invalidate(&self, table: &str) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.cache_remove(&table.to_string());
            }
        }
    }

    fn describe(&self, gateway: &Gateway, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let outcome = gateway.execute_values(
            "SELECT name, type FROM pragma_table_info(?1) ORDER BY cid",
            &[Value::from(table)],
        )?;
        if outcome.rows.is_empty() {
            return Err(DataError::Query(format!("no such table: {}", table)));
        }
        let columns = outcome
            .rows
            .iter()
            .filter_map(|row| {
                let name = row.get("name").and_then(Value::as_str)?;
                if self.audit_columns.iter().any(|audit| audit == name) {
                    return None;
                }
                let decl_type = row.get("type").and_then(Value::as_str);
                Some(ColumnDescriptor {
                    name: name.to_string(),
                    kind: ColumnKind::from_declared(decl_type),
                })
            })
            .collect::<Vec<ColumnDescriptor>>();
        log::debug!("columns of '{}': {:?}", table, &columns);
        Ok(columns)
    }
}
