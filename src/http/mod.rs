//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign / honour x-request-id, open request span)
//!     → server.rs middleware (timeout, body limit, rate limit, metrics)
//!     → external_data.rs | unique_array.rs | health.rs
//!     → response.rs (failures become {"error": ..})
//!     → Send to client
//! ```
//!
//! `doc.rs` and `schemas.rs` describe the same routes as an OpenAPI
//! document served next to a Swagger UI.

pub mod doc;
pub mod external_data;
pub mod health;
pub mod request;
pub mod response;
pub mod schemas;
pub mod server;
pub mod unique_array;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
