//! Configuration structures and loading utilities.
//!
//! Every structure has a `Default` and a `from_env()` that overlays
//! environment variables on top of it.

pub mod api_client;
pub mod client;
pub mod logging;
pub mod payment;

pub use client::*;
pub use logging::*;
pub use payment::*;

// Serialises tests that modify process environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
