//! External-data aggregation over three upstream protocols.
//!
//! # Data Flow
//! ```text
//! GET /external-data?source=..&pokemon=..&number=..
//!     → service.rs (resolve source, enforce parameter policy)
//!     → graphql.rs | rest.rs | soap.rs (consult cache.rs, call upstream)
//!     → NormalizedResult, or ExternalDataError tagged with its source
//!     → classifier.rs (status + fixed message, at the HTTP boundary only)
//! ```
//!
//! # Design Decisions
//! - Dispatch is a closed match over [`Source`]; there is no adapter registry
//! - Every adapter owns its cache instance; nothing is process-global
//! - No retries: the first upstream failure is the answer

pub mod cache;
pub mod classifier;
pub mod error;
pub mod graphql;
mod instrument;
pub mod rest;
pub mod service;
pub mod soap;
pub mod types;

pub use cache::TtlCache;
pub use classifier::{classify, ClassifiedError, ErrorBody};
pub use error::{ErrorKind, ExternalDataError, UpstreamError};
pub use service::ExternalDataService;
pub use types::{FetchParams, NormalizedResult, NumberWords, PokemonSummary, Source};
