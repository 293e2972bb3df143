// Copyright 2025 Alexandre D. Díaz
mod common;

use chrono::{TimeZone, Utc};
use recordstore::models::user::{self, User};
use recordstore::record::{self, Record};
use recordstore::{DataError, FieldMap, Value};

use common::open_store;

fn sample_user(username: &str) -> User {
    let mut user = User::new(username);
    user.email = Some(format!("{}@example.org", username));
    user.tags = vec!["ops".to_string(), "night-shift".to_string()];
    user.last_login = Some(Utc.with_ymd_and_hms(2024, 5, 17, 8, 15, 0).unwrap());
    user
}

/// Record whose table never exists.
struct Ghost {
    id: i64,
}

impl Record for Ghost {
    const TABLE: &'static str = "ghosts";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_field_map(&self) -> FieldMap {
        FieldMap::new()
    }

    fn from_field_map(fields: &FieldMap) -> recordstore::error::Result<Self> {
        Ok(Ghost { id: record::get_i64(fields, "id")? })
    }
}

#[test]
fn insert_assigns_an_id_and_load_returns_the_same_record() {
    let (_dir, mapper) = open_store(2);
    let mut user = sample_user("alice");
    mapper.save(&mut user).unwrap();
    assert!(user.id > 0);

    let loaded = mapper.load::<User>(user.id).unwrap().expect("stored row");
    assert_eq!(loaded, user);
}

#[test]
fn update_keeps_the_id() {
    let (_dir, mapper) = open_store(2);
    let mut user = sample_user("bob");
    mapper.save(&mut user).unwrap();
    let id = user.id;

    user.level = 3;
    user.active = false;
    user.tags.push("lead".to_string());
    user.last_login = None;
    mapper.save(&mut user).unwrap();
    assert_eq!(user.id, id);

    let loaded = mapper.load::<User>(id).unwrap().unwrap();
    assert_eq!(loaded.level, 3);
    assert!(!loaded.active);
    assert_eq!(loaded.tags, vec!["ops", "night-shift", "lead"]);
    assert_eq!(loaded.last_login, None);
    assert_eq!(mapper.load_all::<User>().unwrap().len(), 1);
}

#[test]
fn update_of_a_missing_id_is_not_an_error() {
    let (_dir, mapper) = open_store(1);
    let mut user = sample_user("nobody");
    user.id = 4242;
    mapper.save(&mut user).unwrap();
    assert_eq!(user.id, 4242);
    assert!(mapper.load::<User>(4242).unwrap().is_none());
}

#[test]
fn removing_an_unsaved_record_issues_no_statement() {
    let (_dir, mapper) = open_store(1);
    // "ghosts" does not exist: any statement would fail.
    assert!(!mapper.remove(&Ghost { id: 0 }).unwrap());
    assert!(matches!(mapper.remove(&Ghost { id: 1 }), Err(DataError::Query(_))));
}

#[test]
fn remove_reports_whether_a_row_went_away() {
    let (_dir, mapper) = open_store(1);
    let mut user = sample_user("carol");
    mapper.save(&mut user).unwrap();
    assert!(mapper.remove(&user).unwrap());
    assert!(!mapper.remove(&user).unwrap());
    assert!(mapper.load::<User>(user.id).unwrap().is_none());
}

#[test]
fn load_by_finds_a_row_or_fails_with_not_found() {
    let (_dir, mapper) = open_store(2);
    let mut admin = sample_user("admin");
    admin.level = 1;
    mapper.save(&mut admin).unwrap();

    let found = mapper.load_by::<User>("username", "admin").unwrap();
    assert_eq!(found.id, admin.id);
    assert_eq!(found.level, 1);

    match mapper.load_by::<User>("username", "root") {
        Err(DataError::NotFound { table, field }) => {
            assert_eq!(table, "users");
            assert_eq!(field, "username");
        }
        other => panic!("expected NotFound, got {:?}", other.map(|u| u.username)),
    }
}

#[test]
fn load_all_by_ands_every_filter() {
    let (_dir, mapper) = open_store(2);
    for (name, level, active) in [("u1", 1, true), ("u2", 1, false), ("u3", 0, true)] {
        let mut user = User::new(name);
        user.level = level;
        user.active = active;
        mapper.save(&mut user).unwrap();
    }

    let mut filter = FieldMap::new();
    filter.insert("level".to_string(), Value::Integer(1));
    filter.insert("active".to_string(), Value::Bool(true));
    let users = mapper.load_all_by::<User>(&filter).unwrap();
    assert_eq!(users.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(), vec!["u1"]);

    filter.insert("level".to_string(), Value::Integer(7));
    assert!(mapper.load_all_by::<User>(&filter).unwrap().is_empty());

    assert_eq!(mapper.load_all_by::<User>(&FieldMap::new()).unwrap().len(), 3);
}

#[test]
fn search_requires_every_term_in_some_field() {
    let (_dir, mapper) = open_store(2);
    for (name, email) in [
        ("ana.smith", "ana@corp.io"),
        ("ana.jones", "jones@home.net"),
        ("bob.smith", "bob@corp.io"),
    ] {
        let mut user = User::new(name);
        user.email = Some(email.to_string());
        mapper.save(&mut user).unwrap();
    }

    let names = |users: Vec<User>| {
        let mut names = users.into_iter().map(|u| u.username).collect::<Vec<String>>();
        names.sort();
        names
    };
    assert_eq!(names(user::search(&mapper, "ana").unwrap()), vec!["ana.jones", "ana.smith"]);
    assert_eq!(names(user::search(&mapper, "ana corp").unwrap()), vec!["ana.smith"]);
    assert_eq!(names(user::search(&mapper, "smith").unwrap()), vec!["ana.smith", "bob.smith"]);
    assert!(user::search(&mapper, "ana bob").unwrap().is_empty());
    assert!(mapper.search::<User>(&[], "ana").unwrap().is_empty());
}

#[test]
fn blank_search_equals_load_all() {
    let (_dir, mapper) = open_store(2);
    for name in ["x", "y", "z"] {
        mapper.save(&mut User::new(name)).unwrap();
    }
    let all = mapper.load_all::<User>().unwrap();
    assert_eq!(user::search(&mapper, "").unwrap(), all);
    assert_eq!(user::search(&mapper, "   ").unwrap(), all);
}

#[test]
fn array_shaped_text_does_not_break_a_scan() {
    let (_dir, mapper) = open_store(2);
    let mut odd = User::new("[1]");
    odd.email = Some("[\"a\", \"b\"]".to_string());
    mapper.save(&mut odd).unwrap();
    mapper.save(&mut User::new("plain")).unwrap();

    let all = mapper.load_all::<User>().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].username, "[1]");
    assert_eq!(all[0].email.as_deref(), Some("[\"a\",\"b\"]"));
    assert_eq!(user::search(&mapper, "").unwrap().len(), 2);
    assert_eq!(mapper.load::<User>(odd.id).unwrap().unwrap().username, "[1]");
}

#[test]
fn constraint_violations_surface_the_driver_message() {
    let (_dir, mapper) = open_store(1);
    mapper.save(&mut User::new("dup")).unwrap();
    let mut again = User::new("dup");
    match mapper.save(&mut again) {
        Err(DataError::Query(message)) => assert!(message.contains("UNIQUE"), "{}", message),
        other => panic!("expected a query fault, got {:?}", other),
    }
    assert_eq!(again.id, 0);
}

#[test]
fn missing_fields_are_written_as_null() {
    struct Partial {
        id: i64,
        username: String,
    }

    impl Record for Partial {
        const TABLE: &'static str = "users";

        fn id(&self) -> i64 {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = id;
        }

        fn to_field_map(&self) -> FieldMap {
            let mut fields = FieldMap::new();
            // "mail" does not match the "email" column.
            fields.insert("mail".to_string(), Value::from("lost@example.org"));
            fields.insert("username".to_string(), Value::from(self.username.as_str()));
            fields.insert("level".to_string(), Value::Integer(0));
            fields.insert("active".to_string(), Value::Bool(true));
            fields
        }

        fn from_field_map(fields: &FieldMap) -> recordstore::error::Result<Self> {
            Ok(Partial {
                id: record::get_i64(fields, "id")?,
                username: record::get_string(fields, "username")?,
            })
        }
    }

    let (_dir, mapper) = open_store(1);
    let mut partial = Partial { id: 0, username: "partial".to_string() };
    mapper.save(&mut partial).unwrap();
    let user = mapper.load::<User>(partial.id).unwrap().unwrap();
    assert_eq!(user.email, None);
    assert!(user.tags.is_empty());
}

#[test]
fn audit_columns_are_filled_by_the_database() {
    let (_dir, mapper) = open_store(1);
    let mut user = User::new("audited");
    mapper.save(&mut user).unwrap();
    let outcome = mapper
        .gateway()
        .execute_values("SELECT created_at, updated_at FROM users WHERE id = ?1", &[Value::Integer(user.id)])
        .unwrap();
    let row = &outcome.rows[0];
    assert!(matches!(row.get("created_at"), Some(Value::Timestamp(_))));
    assert!(matches!(row.get("updated_at"), Some(Value::Timestamp(_))));
}
