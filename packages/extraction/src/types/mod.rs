//! Data types shared by the engine, the cache, and plugins.

pub mod cache;
pub mod config;
pub mod document;
pub mod payload;
