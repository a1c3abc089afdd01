//! Formatting and path helpers.

pub mod format;
pub mod route;

pub use format::*;
pub use route::*;
