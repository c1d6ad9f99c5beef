//! Document source implementations.
//!
//! - `MemoryDocumentSource` - snapshots held in memory
//! - `HttpDocumentSource` - snapshot store served over HTTP

mod http;
mod memory;

pub use http::{version_from_headers, HttpDocumentSource, LANDING_URL_HEADER};
pub use memory::MemoryDocumentSource;
