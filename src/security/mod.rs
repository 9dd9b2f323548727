//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-client token bucket)
//!     → body size limit (tower-http, see http/server.rs)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Clients are identified by the first `x-forwarded-for` hop, else peer IP
//! - Rejections carry `retry-after` so well-behaved clients can back off

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiterState};
