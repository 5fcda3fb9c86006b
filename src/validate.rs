//! Body validation: raw JSON in, clean typed record out.
//!
//! A `ValidatedRecord` is the only shape the SQL builder accepts for
//! writes; it cannot be assembled from raw input by hand outside this
//! module. Field problems are aggregated so a client sees every error in
//! one response, not just the first.

use crate::error::{ApiError, FieldError};
use crate::registry::{FieldType, TableSchema};
use serde_json::Value;
use url::Url;

/// A value that passed type checking. URL fields are normalized to plain
/// text here; nothing type-rich ever reaches parameter binding.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Schema-ordered field -> value mapping produced by [`validate`] or
/// [`validate_partial`].
#[derive(Clone, Debug, Default)]
pub struct ValidatedRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl ValidatedRecord {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, FieldValue)> {
        self.fields.iter()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        self.fields.into_iter().map(|(_, v)| v).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// Validate a body for insert: every required field must be present.
/// Fields in the body but not in the schema are dropped, not rejected;
/// clients may over-post without failing (see DESIGN.md).
pub fn validate(schema: &TableSchema, body: &Value) -> Result<ValidatedRecord, ApiError> {
    run(schema, body, true)
}

/// Validate a body for update: only the fields present are checked, so
/// partial updates work. Presence of at least one known field is the
/// caller's concern (an empty record is a 400 at the endpoint).
pub fn validate_partial(schema: &TableSchema, body: &Value) -> Result<ValidatedRecord, ApiError> {
    run(schema, body, false)
}

fn run(schema: &TableSchema, body: &Value, enforce_required: bool) -> Result<ValidatedRecord, ApiError> {
    let map = body
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("request body must be a JSON object".into()))?;

    let mut fields = Vec::new();
    let mut errors = Vec::new();

    for spec in &schema.fields {
        // JSON null counts as absent, matching optional-field semantics.
        let raw = map.get(spec.name).filter(|v| !v.is_null());
        match raw {
            None => {
                if enforce_required && spec.required {
                    errors.push(FieldError::missing(spec.name));
                }
            }
            Some(v) => match coerce(spec.name, spec.ty, v) {
                Ok(value) => fields.push((spec.name, value)),
                Err(e) => errors.push(e),
            },
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation {
            table: schema.table_name.to_string(),
            errors,
        });
    }
    Ok(ValidatedRecord { fields })
}

fn coerce(field: &str, ty: FieldType, v: &Value) -> Result<FieldValue, FieldError> {
    match ty {
        FieldType::Text => match v {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            other => Err(FieldError::type_mismatch(field, ty.expected(), json_kind(other))),
        },
        FieldType::Integer => match v {
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Int)
                .ok_or_else(|| FieldError::type_mismatch(field, ty.expected(), "a non-integral number")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| FieldError::type_mismatch(field, ty.expected(), "string")),
            other => Err(FieldError::type_mismatch(field, ty.expected(), json_kind(other))),
        },
        FieldType::Float => match v {
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| FieldError::type_mismatch(field, ty.expected(), "number")),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| FieldError::type_mismatch(field, ty.expected(), "string")),
            other => Err(FieldError::type_mismatch(field, ty.expected(), json_kind(other))),
        },
        FieldType::Url => match v {
            Value::String(s) => Url::parse(s)
                .map(|u| FieldValue::Text(u.to_string()))
                .map_err(|e| FieldError::bad_url(field, &e.to_string())),
            other => Err(FieldError::type_mismatch(field, ty.expected(), json_kind(other))),
        },
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
