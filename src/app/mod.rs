pub use multimarmore_domain as domain;

pub mod cache;
pub mod column_diagnosis;
pub mod export;
pub mod ports;
pub mod repository;
pub mod schema_safe;
pub mod stock;

pub use column_diagnosis::{PostgrestColumnClassifier, extract_column_name, is_unknown_column_error};
pub use repository::{Repository, RepositoryError, WriteReport};
pub use schema_safe::{RetryOptions, SchemaSafeWriter, with_schema_safe_retry};
