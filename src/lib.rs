//! Backend challenge service library.
//!
//! Three endpoint groups over one axum router: array deduplication,
//! external-data aggregation across GraphQL, REST and SOAP upstreams, and
//! health checks.

pub mod array;
pub mod config;
pub mod external;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
