//! Dispatch pipeline: plugin selection behind the freshness cache.
//!
//! ```text
//! id ──► FreshnessCache ──hit──► payload
//!             │ miss/stale
//!             ▼
//!        DocumentSource::fetch ──► SelectionEngine ──► normalize ──► store
//! ```

pub mod cache;
pub mod select;

pub use cache::{FreshnessCache, Resolution};
pub use select::{Selection, SelectionEngine};
