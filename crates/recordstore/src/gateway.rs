// Copyright 2025 Alexandre D. Díaz
//! Statement execution over the bounded connection pool.
use std::fs;
use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;

use crate::coercion::{ColumnKind, TypeCoercion};
use crate::config::StoreConfig;
use crate::error::{DataError, Result};
use crate::value::{FieldMap, Value};
use crate::{Connection, Pool};

/// One result row, columns kept in statement order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn into_field_map(self) -> FieldMap {
        self.cells.into_iter().collect()
    }
}

#[derive(Debug, Default)]
pub struct QueryOutcome {
    pub rows: Vec<Row>,
    pub affected: usize,
    /// Rowid assigned by an `INSERT`/`REPLACE`; 0 for any other statement.
    pub last_insert_id: i64,
}

/// Cells copied out of SQLite while the connection is still borrowed.
struct RawOutcome {
    columns: Vec<(String, ColumnKind)>,
    rows: Vec<Vec<SqlValue>>,
    affected: usize,
    last_insert_id: i64,
}

impl RawOutcome {
    fn coerce(self, coercion: &TypeCoercion) -> QueryOutcome {
        let columns = self.columns;
        let rows = self
            .rows
            .into_iter()
            .map(|cells| Row {
                cells: columns
                    .iter()
                    .zip(cells)
                    .map(|((name, kind), raw)| (name.clone(), coercion.parse_from_read(raw, *kind)))
                    .collect(),
            })
            .collect();
        QueryOutcome {
            rows,
            affected: self.affected,
            last_insert_id: self.last_insert_id,
        }
    }
}

pub struct Gateway {
    pool: Pool,
    coercion: TypeCoercion,
}

impl Gateway {
    pub fn new(pool: Pool, coercion: TypeCoercion) -> Gateway {
        Gateway { pool, coercion }
    }

    /// Opens (creating if needed) the SQLite file and fills the pool.
    pub fn open(config: &StoreConfig) -> Result<Gateway> {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| DataError::Query(err.to_string()))?;
            }
        }
        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(&config.db_path).with_init(move |conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(busy_timeout)
        });
        let pool = Pool::builder()
            .max_size(config.pool_max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)?;
        log::info!(
            "database pool ready at '{}' ({} connections)",
            &config.db_path,
            config.pool_max_size
        );
        Ok(Gateway::new(pool, TypeCoercion::new(config.sniff_json_arrays)))
    }

    pub fn coercion(&self) -> &TypeCoercion {
        &self.coercion
    }

    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }

    /// Runs one statement on a pooled connection.
    ///
    /// The connection goes back to the pool before any row is coerced, and
    /// on every error path. Failures are reported once, never retried.
    pub fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<QueryOutcome> {
        log::debug!("query: {}", sql);
        if !params.is_empty() {
            log::debug!("values: {:?}", params);
        }
        let raw = {
            let conn = self.pool.get()?;
            run(&conn, sql, params).map_err(|err| {
                log::error!("query failed: {} ({})", err, sql);
                DataError::from(err)
            })?
        };
        Ok(raw.coerce(&self.coercion))
    }

    /// Same as [`Gateway::execute`], taking [`Value`]s through the write coercion.
    pub fn execute_values(&self, sql: &str, params: &[Value]) -> Result<QueryOutcome> {
        let params = params
            .iter()
            .map(|value| self.coercion.format_for_write(value))
            .collect::<Vec<SqlValue>>();
        self.execute(sql, &params)
    }

    /// Drops the pool; idle connections are closed here, borrowed ones when returned.
    pub fn close(self) {
        let state = self.pool.state();
        log::info!(
            "closing database pool ({} connections, {} idle)",
            state.connections,
            state.idle_connections
        );
    }
}

fn run(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<RawOutcome, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() == 0 {
        let affected = stmt.execute(params_from_iter(params.iter()))?;
        let last_insert_id = if is_insert(sql) && affected > 0 {
            conn.last_insert_rowid()
        } else {
            0
        };
        return Ok(RawOutcome {
            columns: Vec::new(),
            rows: Vec::new(),
            affected,
            last_insert_id,
        });
    }
    let columns = stmt
        .columns()
        .iter()
        .map(|col| (col.name().to_string(), ColumnKind::from_declared(col.decl_type())))
        .collect::<Vec<(String, ColumnKind)>>();
    let mut raw_rows: Vec<Vec<SqlValue>> = Vec::new();
    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            cells.push(row.get::<_, SqlValue>(idx)?);
        }
        raw_rows.push(cells);
    }
    Ok(RawOutcome {
        columns,
        rows: raw_rows,
        affected: 0,
        last_insert_id: 0,
    })
}

/// The pooled connection keeps the rowid of its last insert across statements.
fn is_insert(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default();
    keyword.eq_ignore_ascii_case("insert") || keyword.eq_ignore_ascii_case("replace")
}
