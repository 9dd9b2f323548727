//! Numeric array utilities behind `POST /unique-array`.

pub mod dedup;

pub use dedup::{dedup_sort, JsonNumber};
