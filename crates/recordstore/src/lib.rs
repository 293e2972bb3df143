// Copyright 2025 Alexandre D. Díaz
pub mod coercion;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mapper;
pub mod models;
pub mod record;
pub mod schema;
pub mod sql;
pub mod utils;
pub mod value;

pub use coercion::{ColumnKind, TypeCoercion};
pub use config::StoreConfig;
pub use error::DataError;
pub use gateway::{Gateway, QueryOutcome, Row};
pub use mapper::RecordMapper;
pub use record::Record;
pub use schema::{ColumnDescriptor, SchemaIntrospector};
pub use value::{FieldMap, Value};

pub type Pool = r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>;
pub type Connection = r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>;
