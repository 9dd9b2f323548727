//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health           → static liveness, no upstream traffic
//! GET /health/detailed  → probe.rs
//!     → GraphQL ping ┐
//!     → REST ping    ├ concurrent, independent deadlines
//!     → SOAP connect ┘
//!     → report.rs (ok iff all ok, else degraded)
//! ```
//!
//! # Design Decisions
//! - Checks are on demand; there is no background monitor
//! - The probe reports, it never fails: HTTP status is always 200
//! - No `error` overall state; total outage is still `degraded`

pub mod probe;
pub mod report;

pub use probe::HealthProbe;
pub use report::{HealthReport, OverallStatus, ServiceHealth, ServiceStatus};
