//! Core trait abstractions for the extraction library.
//!
//! These traits define the seams the engine is assembled from: plugins,
//! the snapshot store, the result cache, and the clock.

pub mod clock;
pub mod extractor;
pub mod source;
pub mod store;
