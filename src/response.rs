//! Success response bodies for the write endpoints. Reads return the raw
//! row array, matching the wire contract the dashboards already consume.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Inserted {
    pub message: String,
    pub new_id: i64,
}

impl Inserted {
    pub fn new(table: &str, new_id: i64) -> Self {
        Inserted {
            message: format!("row inserted into table '{}'", table),
            new_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Affected {
    pub message: String,
    pub rows_affected: u64,
}

impl Affected {
    pub fn updated(table: &str, id: i64, rows_affected: u64) -> Self {
        Affected {
            message: format!("item {} updated in table '{}'", id, table),
            rows_affected,
        }
    }

    pub fn deleted(table: &str, id: i64, rows_affected: u64) -> Self {
        Affected {
            message: format!("item {} deleted from table '{}'", id, table),
            rows_affected,
        }
    }
}
