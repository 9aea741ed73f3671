pub use multimarmore_app as app;
pub use multimarmore_domain as domain;
pub use multimarmore_infra as infra;

pub mod error;
