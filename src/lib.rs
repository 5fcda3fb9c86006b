//! metastats-api: generic table-driven CRUD backend for esports metagame
//! statistics.
//!
//! A fixed schema registry and a two-tier table whitelist drive four
//! generic endpoints (read-all, insert, update-by-id, delete-by-id) plus a
//! documentation helper. SQL identifiers only ever come from the registry,
//! values only ever bind as parameters.

pub mod error;
pub mod handlers;
pub mod policy;
pub mod registry;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod validate;

pub use error::{ApiError, FieldError, FieldErrorKind, RegistryError};
pub use policy::AccessPolicy;
pub use registry::{FieldSpec, FieldType, SchemaRegistry, TableSchema};
pub use routes::{api_routes, common_routes};
pub use service::CrudService;
pub use state::AppState;
pub use validate::{validate, validate_partial, FieldValue, ValidatedRecord};
