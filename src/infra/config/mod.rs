pub mod deployments_file;
pub mod env;

pub use env::{process_env, resolve_deployment};
