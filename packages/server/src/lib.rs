// Affiliation extraction service - API Core
//
// HTTP boundary over the affiliation-extraction library: one route per
// document class, a health check, and process wiring (config, cache
// backend, snapshot source).

pub mod config;
pub mod server;

pub use config::*;
