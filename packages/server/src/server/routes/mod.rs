// HTTP routes
pub mod health;
pub mod resolve;

pub use health::*;
pub use resolve::*;
