// Copyright 2025 Alexandre D. Díaz
//! Generic CRUD and keyword search over any [`Record`] type.
use rusqlite::types::Value as SqlValue;

use crate::config::StoreConfig;
use crate::error::{DataError, Result};
use crate::gateway::{Gateway, Row};
use crate::record::Record;
use crate::schema::SchemaIntrospector;
use crate::sql::{self, ID_COLUMN};
use crate::value::{FieldMap, Value};

pub struct RecordMapper {
    gateway: Gateway,
    schema: SchemaIntrospector,
}

impl RecordMapper {
    pub fn new(gateway: Gateway, schema: SchemaIntrospector) -> RecordMapper {
        RecordMapper { gateway, schema }
    }

    pub fn open(config: &StoreConfig) -> Result<RecordMapper> {
        Ok(RecordMapper::new(
            Gateway::open(config)?,
            SchemaIntrospector::from_config(config),
        ))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn schema(&self) -> &SchemaIntrospector {
        &self.schema
    }

    pub fn close(self) {
        self.gateway.close();
    }

    /// Inserts the record when its id is 0 (and stores the new id on it),
    /// otherwise updates the row with the same id.
    ///
    /// Updating an id that has no row is not an error; it is only logged.
    pub fn save<T: Record>(&self, record: &mut T) -> Result<()> {
        let columns = self.schema.column_names_of(&self.gateway, T::TABLE)?;
        let fields = record.to_field_map();
        if record.id() == 0 {
            let params = columns
                .iter()
                .map(|column| {
                    if column == ID_COLUMN {
                        SqlValue::Null
                    } else {
                        self.write_value(&fields, column)
                    }
                })
                .collect::<Vec<SqlValue>>();
            let outcome = self
                .gateway
                .execute(&sql::build_insert(T::TABLE, &columns), &params)?;
            record.set_id(outcome.last_insert_id);
            log::debug!("inserted '{}' #{}", T::TABLE, outcome.last_insert_id);
            return Ok(());
        }

        let columns = columns
            .into_iter()
            .filter(|column| column != ID_COLUMN)
            .collect::<Vec<String>>();
        if columns.is_empty() {
            return Ok(());
        }
        let mut params = columns
            .iter()
            .map(|column| self.write_value(&fields, column))
            .collect::<Vec<SqlValue>>();
        params.push(SqlValue::Integer(record.id()));
        let outcome = self
            .gateway
            .execute(&sql::build_update(T::TABLE, &columns), &params)?;
        if outcome.affected == 0 {
            log::warn!("update of '{}' #{} matched no row", T::TABLE, record.id());
        }
        Ok(())
    }

    /// Deletes the record's row. Unsaved records are left alone and report `false`.
    pub fn remove<T: Record>(&self, record: &T) -> Result<bool> {
        if record.id() == 0 {
            return Ok(false);
        }
        let outcome = self.gateway.execute(
            &sql::build_delete_by_id(T::TABLE),
            &[SqlValue::Integer(record.id())],
        )?;
        Ok(outcome.affected > 0)
    }

    pub fn load<T: Record>(&self, id: i64) -> Result<Option<T>> {
        let outcome = self
            .gateway
            .execute(&sql::build_select_by_id(T::TABLE), &[SqlValue::Integer(id)])?;
        match outcome.rows.into_iter().next() {
            Some(row) => Ok(Some(hydrate(row)?)),
            None => Ok(None),
        }
    }

    pub fn load_all<T: Record>(&self) -> Result<Vec<T>> {
        let outcome = self.gateway.execute(&sql::build_select_all(T::TABLE), &[])?;
        hydrate_all(outcome.rows)
    }

    /// First row (in the order SQLite yields them) with `field = value`.
    pub fn load_by<T: Record>(&self, field: &str, value: impl Into<Value>) -> Result<T> {
        let sql = format!("{} LIMIT 1", sql::build_select_by(T::TABLE, &[field]));
        let outcome = self.gateway.execute_values(&sql, &[value.into()])?;
        match outcome.rows.into_iter().next() {
            Some(row) => hydrate(row),
            None => Err(DataError::NotFound {
                table: T::TABLE.to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Rows matching every `field = value` pair. An empty filter returns the whole table.
    pub fn load_all_by<T: Record>(&self, filter: &FieldMap) -> Result<Vec<T>> {
        let fields = filter.keys().map(String::as_str).collect::<Vec<&str>>();
        let params = filter.values().cloned().collect::<Vec<Value>>();
        let outcome = self
            .gateway
            .execute_values(&sql::build_select_by(T::TABLE, fields.as_slice()), &params)?;
        hydrate_all(outcome.rows)
    }

    /// See [`sql::build_search`] for how `keyword` is matched.
    pub fn search<T: Record>(&self, fields: &[&str], keyword: &str) -> Result<Vec<T>> {
        let (sql, params) = match sql::build_search(T::TABLE, fields, keyword) {
            Some(statement) => statement,
            None => return Ok(Vec::new()),
        };
        let outcome = self.gateway.execute_values(&sql, &params)?;
        hydrate_all(outcome.rows)
    }

    fn write_value(&self, fields: &FieldMap, column: &str) -> SqlValue {
        match fields.get(column) {
            Some(value) => self.gateway.coercion().format_for_write(value),
            None => SqlValue::Null,
        }
    }
}

fn hydrate<T: Record>(row: Row) -> Result<T> {
    T::from_field_map(&row.into_field_map())
}

fn hydrate_all<T: Record>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(hydrate).collect()
}
