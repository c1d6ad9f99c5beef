//! Cache store implementations.
//!
//! Available backends:
//! - `MemoryCacheStore` - In-memory storage (always available)
//! - `PostgresCacheStore` - PostgreSQL storage (requires `postgres` feature)

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryCacheStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCacheStore;
