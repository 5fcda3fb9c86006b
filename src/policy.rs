//! Access policy: the two table whitelists consulted before any SQL is built.
//!
//! Tables absent from both sets are neither readable nor writable. Every
//! route goes through this gate; nothing else may turn a path segment into
//! an identifier.

use crate::error::RegistryError;
use crate::registry::SchemaRegistry;
use std::collections::HashSet;

/// Fact tables populated solely by the ETL pipeline: exposed for read,
/// never for write, so the generic write endpoints cannot corrupt
/// pipeline-owned aggregates.
const READ_ONLY_TABLES: &[&str] = &[
    "hero_win",
    "hero_pick",
    "hero_map_win",
    "hero_map_pick",
    "hero_rank_win",
    "hero_rank_pick",
    "hero_rank_map_win",
    "hero_rank_map_pick",
];

/// Dimension tables that a human operator may need to correct by hand.
const EDITABLE_TABLES: &[&str] = &["hero", "map", "role", "rank", "game_mode"];

#[derive(Clone, Debug)]
pub struct AccessPolicy {
    read_only: HashSet<String>,
    editable: HashSet<String>,
}

impl AccessPolicy {
    pub fn builtin() -> Self {
        Self::new(
            READ_ONLY_TABLES.iter().map(|s| s.to_string()),
            EDITABLE_TABLES.iter().map(|s| s.to_string()),
        )
    }

    pub fn new(
        read_only: impl IntoIterator<Item = String>,
        editable: impl IntoIterator<Item = String>,
    ) -> Self {
        AccessPolicy {
            read_only: read_only.into_iter().map(|s| s.to_lowercase()).collect(),
            editable: editable.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Readable = read-only union editable.
    pub fn can_read(&self, table_name: &str) -> bool {
        let key = table_name.to_lowercase();
        self.read_only.contains(&key) || self.editable.contains(&key)
    }

    /// Writable = editable only.
    pub fn can_write(&self, table_name: &str) -> bool {
        self.editable.contains(&table_name.to_lowercase())
    }

    /// Startup cross-check against the registry: every writable table must
    /// have a schema, and every schema'd table must be reachable through
    /// some whitelist. Turns a class of runtime 400s into a boot failure.
    pub fn check_consistent(&self, registry: &SchemaRegistry) -> Result<(), RegistryError> {
        for table in &self.editable {
            if !registry.contains(table) {
                return Err(RegistryError::WritableWithoutSchema(table.clone()));
            }
        }
        for table in registry.table_names() {
            if !self.can_read(table) {
                return Err(RegistryError::SchemaWithoutAccess(table.to_string()));
            }
        }
        Ok(())
    }
}
