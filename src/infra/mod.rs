pub use multimarmore_app as app;
pub use multimarmore_domain as domain;

pub mod adapters;
pub mod config;
pub mod export;
