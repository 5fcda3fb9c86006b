//! Safe statement builders: identifiers from the registry only, values as
//! `$n` parameters.
//!
//! Every identifier passes through [`quoted`] even though table and column
//! names are whitelist-checked upstream, so a future whitelist bug cannot
//! become an injection bug.

use crate::error::ApiError;
use crate::registry::TableSchema;
use crate::validate::{FieldValue, ValidatedRecord};

/// A built statement and its bind parameters, in binding order.
#[derive(Clone, Debug)]
pub struct StatementBuf {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

/// Quote an identifier for PostgreSQL.
fn quoted(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `SELECT * FROM "t"`. An empty row set is data, not an error; callers
/// decide what zero rows means.
pub fn select_all(schema: &TableSchema) -> String {
    format!("SELECT * FROM {}", quoted(schema.table_name))
}

/// `INSERT INTO "t" ("c1", "c2") VALUES ($1, $2) RETURNING "t_id"`.
/// Column order and value order come from the record together, so they
/// cannot drift apart. An empty record is an error, never an empty
/// statement.
pub fn insert(schema: &TableSchema, record: &ValidatedRecord) -> Result<StatementBuf, ApiError> {
    if record.is_empty() {
        return Err(ApiError::BadRequest("request body produced no fields to insert".into()));
    }
    let columns: Vec<String> = record.iter().map(|(name, _)| quoted(name)).collect();
    let placeholders: Vec<String> = (1..=record.len()).map(|n| format!("${}", n)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(schema.table_name),
        columns.join(", "),
        placeholders.join(", "),
        quoted(&schema.pk_column()),
    );
    Ok(StatementBuf { sql, params: record.clone().into_values() })
}

/// `UPDATE "t" SET "c1" = $1, ... WHERE "t_id" = $n` with the id bound
/// last, after the record values in SET emission order.
pub fn update(schema: &TableSchema, id: i64, record: &ValidatedRecord) -> Result<StatementBuf, ApiError> {
    if record.is_empty() {
        return Err(ApiError::BadRequest("request body produced no fields to update".into()));
    }
    let sets: Vec<String> = record
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{} = ${}", quoted(name), i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(schema.table_name),
        sets.join(", "),
        quoted(&schema.pk_column()),
        record.len() + 1,
    );
    let mut params = record.clone().into_values();
    params.push(FieldValue::Int(id));
    Ok(StatementBuf { sql, params })
}

/// `DELETE FROM "t" WHERE "t_id" = $1`.
pub fn delete(schema: &TableSchema, id: i64) -> StatementBuf {
    let sql = format!(
        "DELETE FROM {} WHERE {} = $1",
        quoted(schema.table_name),
        quoted(&schema.pk_column()),
    );
    StatementBuf { sql, params: vec![FieldValue::Int(id)] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::validate::validate;
    use serde_json::json;

    fn hero_record() -> (TableSchema, ValidatedRecord) {
        let schema = SchemaRegistry::builtin().resolve("hero").unwrap().clone();
        let record = validate(&schema, &json!({"hero_name": "Reinhardt", "role_id": 1})).unwrap();
        (schema, record)
    }

    #[test]
    fn select_all_quotes_the_table() {
        let schema = SchemaRegistry::builtin().resolve("game_mode").unwrap().clone();
        assert_eq!(select_all(&schema), r#"SELECT * FROM "game_mode""#);
    }

    #[test]
    fn insert_columns_match_placeholder_order() {
        let (schema, record) = hero_record();
        let q = insert(&schema, &record).unwrap();
        assert_eq!(
            q.sql,
            r#"INSERT INTO "hero" ("hero_name", "role_id") VALUES ($1, $2) RETURNING "hero_id""#
        );
        assert_eq!(q.params.len(), 2);
        assert_eq!(q.params[0], FieldValue::Text("Reinhardt".into()));
        assert_eq!(q.params[1], FieldValue::Int(1));
    }

    #[test]
    fn insert_rejects_an_empty_record() {
        let schema = SchemaRegistry::builtin().resolve("hero").unwrap().clone();
        let err = insert(&schema, &ValidatedRecord::default()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn update_binds_the_id_last() {
        let (schema, record) = hero_record();
        let q = update(&schema, 42, &record).unwrap();
        assert_eq!(
            q.sql,
            r#"UPDATE "hero" SET "hero_name" = $1, "role_id" = $2 WHERE "hero_id" = $3"#
        );
        assert_eq!(q.params.last(), Some(&FieldValue::Int(42)));
    }

    #[test]
    fn update_rejects_an_empty_record() {
        let schema = SchemaRegistry::builtin().resolve("hero").unwrap().clone();
        let err = update(&schema, 1, &ValidatedRecord::default()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn delete_targets_the_conventional_pk() {
        let schema = SchemaRegistry::builtin().resolve("map").unwrap().clone();
        let q = delete(&schema, 7);
        assert_eq!(q.sql, r#"DELETE FROM "map" WHERE "map_id" = $1"#);
        assert_eq!(q.params, vec![FieldValue::Int(7)]);
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        assert_eq!(quoted(r#"evil"name"#), r#""evil""name""#);
    }
}
