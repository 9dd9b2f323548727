//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → axum stops accepting → in-flight requests drain → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup lives in main.rs: config, logging, metrics, listener
//! - In-flight upstream calls are not cancelled; they finish and drain

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
