// Copyright 2025 Alexandre D. Díaz
//! Statement text for the single-table operations of the mapper.
//!
//! Identifiers are quoted, values are always left as `?` placeholders.
use crate::value::Value;

pub static ID_COLUMN: &str = "id";

pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub fn build_insert(table: &str, columns: &[String]) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.iter().map(|x| quote_ident(x)).collect::<Vec<String>>().join(", "),
        placeholders(columns.len())
    )
}

/// `columns` must not contain the id column; the id is the last parameter.
pub fn build_update(table: &str, columns: &[String]) -> String {
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quote_ident(table),
        columns
            .iter()
            .map(|x| format!("{} = ?", quote_ident(x)))
            .collect::<Vec<String>>()
            .join(", "),
        quote_ident(ID_COLUMN)
    )
}

pub fn build_delete_by_id(table: &str) -> String {
    format!("DELETE FROM {} WHERE {} = ?1", quote_ident(table), quote_ident(ID_COLUMN))
}

pub fn build_select_by_id(table: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = ?1 LIMIT 1",
        quote_ident(table),
        quote_ident(ID_COLUMN)
    )
}

pub fn build_select_all(table: &str) -> String {
    format!("SELECT * FROM {}", quote_ident(table))
}

/// Equality on every field, AND-combined. No fields means no WHERE clause.
pub fn build_select_by<S: AsRef<str>>(table: &str, fields: &[S]) -> String {
    if fields.is_empty() {
        return build_select_all(table);
    }
    format!(
        "SELECT * FROM {} WHERE {}",
        quote_ident(table),
        fields
            .iter()
            .map(|x| format!("{} = ?", quote_ident(x.as_ref())))
            .collect::<Vec<String>>()
            .join(" AND ")
    )
}

/// Keyword search: every whitespace separated term has to appear (`LIKE`)
/// in at least one of `fields`.
///
/// A blank keyword is a plain table scan. With terms but no fields nothing
/// can match and `None` is returned so the caller can skip the round trip.
/// `%` and `_` inside a term keep their `LIKE` meaning.
pub fn build_search<S: AsRef<str>>(table: &str, fields: &[S], keyword: &str) -> Option<(String, Vec<Value>)> {
    let terms = keyword.split_whitespace().collect::<Vec<&str>>();
    if terms.is_empty() {
        return Some((build_select_all(table), Vec::new()));
    }
    if fields.is_empty() {
        return None;
    }
    let per_term = format!(
        "({})",
        fields
            .iter()
            .map(|x| format!("{} LIKE ?", quote_ident(x.as_ref())))
            .collect::<Vec<String>>()
            .join(" OR ")
    );
    let conditions = vec![per_term; terms.len()].join(" AND ");
    let mut params: Vec<Value> = Vec::with_capacity(terms.len() * fields.len());
    for term in &terms {
        let pattern = format!("%{}%", term);
        params.extend(fields.iter().map(|_| Value::Text(pattern.clone())));
    }
    Some((
        format!("SELECT * FROM {} WHERE {}", quote_ident(table), conditions),
        params,
    ))
}
