// Copyright 2025 Alexandre D. Díaz
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gateway::Gateway;
use crate::mapper::RecordMapper;
use crate::record::{self, Record};
use crate::value::{FieldMap, Value};

pub const TABLE_NAME: &str = "users";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub level: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(username: &str) -> User {
        User {
            id: 0,
            username: username.to_string(),
            email: None,
            level: 0,
            active: true,
            tags: Vec::new(),
            last_login: None,
        }
    }
}

impl Record for User {
    const TABLE: &'static str = TABLE_NAME;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), Value::Integer(self.id));
        fields.insert("username".to_string(), Value::from(self.username.as_str()));
        fields.insert("email".to_string(), Value::from(self.email.clone()));
        fields.insert("level".to_string(), Value::Integer(self.level));
        fields.insert("active".to_string(), Value::Bool(self.active));
        fields.insert("tags".to_string(), Value::Json(serde_json::Value::from(self.tags.clone())));
        fields.insert("last_login".to_string(), Value::from(self.last_login));
        fields
    }

    fn from_field_map(fields: &FieldMap) -> Result<Self> {
        Ok(User {
            id: record::get_i64(fields, "id")?,
            username: record::get_string(fields, "username")?,
            email: record::get_opt_string(fields, "email")?,
            level: record::get_i64(fields, "level")?,
            active: record::get_bool(fields, "active")?,
            tags: record::get_json(fields, "tags")?,
            last_login: record::get_opt_timestamp(fields, "last_login")?,
        })
    }
}

pub fn create_table(gateway: &Gateway) -> Result<()> {
    gateway.execute(
        format!(
            "CREATE TABLE IF NOT EXISTS {0} (
            id integer primary key,
            username text not null,
            email text,
            level integer not null default 0,
            active boolean not null default 1,
            tags json,
            last_login datetime,
            created_at datetime not null default CURRENT_TIMESTAMP,
            updated_at datetime not null default CURRENT_TIMESTAMP
        )",
            &TABLE_NAME
        )
        .as_str(),
        &[],
    )?;
    gateway.execute(
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_users_username ON {}(username)",
            &TABLE_NAME
        )
        .as_str(),
        &[],
    )?;
    gateway.execute(
        format!(
            "CREATE TRIGGER IF NOT EXISTS trg_users_updated_at AFTER UPDATE ON {0}
            BEGIN
                UPDATE {0} SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
            END",
            &TABLE_NAME
        )
        .as_str(),
        &[],
    )?;
    Ok(())
}

pub fn get_by_username(mapper: &RecordMapper, username: &str) -> Result<User> {
    mapper.load_by::<User>("username", username)
}

/// Users whose username or email contains every word of `keyword`.
pub fn search(mapper: &RecordMapper, keyword: &str) -> Result<Vec<User>> {
    mapper.search::<User>(&["username", "email"], keyword)
}
