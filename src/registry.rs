//! Schema registry: the fixed mapping from table name to record schema.
//!
//! Descriptors are built once at startup and never change; handlers reach
//! them through shared state rather than module globals, so the registry is
//! unit-testable in isolation.

use crate::error::ApiError;
use serde_json::Value;
use std::collections::HashMap;

/// Declared type of a body field. `Url` values are validated for
/// well-formedness and normalized to a plain string before binding; the
/// storage layer only ever sees text, integers and floats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Url,
}

impl FieldType {
    /// Human-readable name for validation messages.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldType::Text => "a string",
            FieldType::Integer => "an integer",
            FieldType::Float => "a number",
            FieldType::Url => "a URL string",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    /// Sample value surfaced by the `/models/{table}/example` endpoint.
    pub example: Value,
}

fn required(name: &'static str, ty: FieldType, example: Value) -> FieldSpec {
    FieldSpec { name, ty, required: true, example }
}

fn optional(name: &'static str, ty: FieldType, example: Value) -> FieldSpec {
    FieldSpec { name, ty, required: false, example }
}

/// Ordered field list for one table. Field names map 1:1 to column names;
/// the primary key column is `<table>_id` by convention and is never part
/// of the body schema.
#[derive(Clone, Debug)]
pub struct TableSchema {
    pub table_name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    /// Conventional primary key column, e.g. `hero` -> `hero_id`.
    pub fn pk_column(&self) -> String {
        format!("{}_id", self.table_name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sample JSON body built from the per-field examples.
    pub fn example_body(&self) -> Value {
        let mut map = serde_json::Map::new();
        for f in &self.fields {
            map.insert(f.name.to_string(), f.example.clone());
        }
        Value::Object(map)
    }
}

/// Immutable table-name -> schema lookup, case-insensitive on the name.
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    by_name: HashMap<&'static str, TableSchema>,
}

impl SchemaRegistry {
    /// All thirteen metagame tables: five editable dimension tables and
    /// eight ETL-owned fact tables.
    pub fn builtin() -> Self {
        use FieldType::*;
        let tables = vec![
            TableSchema {
                table_name: "hero",
                fields: vec![
                    required("hero_name", Text, Value::from("Reinhardt")),
                    required("role_id", Integer, Value::from(1)),
                    optional(
                        "hero_icon_img_link",
                        Url,
                        Value::from("https://example.com/icons/reinhardt.png"),
                    ),
                ],
            },
            TableSchema {
                table_name: "map",
                fields: vec![
                    required("game_mode_id", Integer, Value::from(1)),
                    required("map_name", Text, Value::from("King's Row")),
                ],
            },
            TableSchema {
                table_name: "role",
                fields: vec![required("role", Text, Value::from("Tank"))],
            },
            TableSchema {
                table_name: "rank",
                fields: vec![required("rank_name", Text, Value::from("Gold"))],
            },
            TableSchema {
                table_name: "game_mode",
                fields: vec![required("game_mode_name", Text, Value::from("Hybrid"))],
            },
            TableSchema {
                table_name: "hero_win",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("win_rate", Float, Value::from(50.55)),
                ],
            },
            TableSchema {
                table_name: "hero_pick",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("pick_rate", Float, Value::from(10.1)),
                ],
            },
            TableSchema {
                table_name: "hero_map_win",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("map_id", Integer, Value::from(1)),
                    required("win_rate", Float, Value::from(55.0)),
                ],
            },
            TableSchema {
                table_name: "hero_map_pick",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("map_id", Integer, Value::from(1)),
                    required("pick_rate", Float, Value::from(8.2)),
                ],
            },
            TableSchema {
                table_name: "hero_rank_win",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("rank_id", Integer, Value::from(1)),
                    required("win_rate", Float, Value::from(52.9)),
                ],
            },
            TableSchema {
                table_name: "hero_rank_pick",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("rank_id", Integer, Value::from(1)),
                    required("pick_rate", Float, Value::from(10.1)),
                ],
            },
            TableSchema {
                table_name: "hero_rank_map_win",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("rank_id", Integer, Value::from(1)),
                    required("map_id", Integer, Value::from(1)),
                    required("win_rate", Float, Value::from(54.3)),
                ],
            },
            TableSchema {
                table_name: "hero_rank_map_pick",
                fields: vec![
                    required("hero_id", Integer, Value::from(1)),
                    required("rank_id", Integer, Value::from(1)),
                    required("map_id", Integer, Value::from(1)),
                    required("pick_rate", Float, Value::from(12.5)),
                ],
            },
        ];
        let by_name = tables.into_iter().map(|t| (t.table_name, t)).collect();
        SchemaRegistry { by_name }
    }

    /// Pure lookup. Unknown names surface as a client error since the name
    /// comes straight from the URL path.
    pub fn resolve(&self, table_name: &str) -> Result<&TableSchema, ApiError> {
        let key = table_name.to_lowercase();
        self.by_name
            .get(key.as_str())
            .ok_or_else(|| ApiError::UnknownTable(table_name.to_string()))
    }

    pub fn contains(&self, table_name: &str) -> bool {
        self.by_name.contains_key(table_name.to_lowercase().as_str())
    }

    pub fn table_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }
}
