//! Shared application state: pool, registry and policy, all immutable
//! after startup.

use crate::error::RegistryError;
use crate::policy::AccessPolicy;
use crate::registry::SchemaRegistry;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub registry: Arc<SchemaRegistry>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    /// Build state with the builtin registry and policy, cross-checked so
    /// a whitelist/schema mismatch fails at boot instead of per request.
    pub fn new(pool: PgPool) -> Result<Self, RegistryError> {
        let registry = SchemaRegistry::builtin();
        let policy = AccessPolicy::builtin();
        policy.check_consistent(&registry)?;
        Ok(AppState {
            pool,
            registry: Arc::new(registry),
            policy: Arc::new(policy),
        })
    }
}
