//! Data models mirrored from the AmalSAS REST API.
//!
//! Entities are plain records; the only invariants enforced client side live
//! in the form validators under `services/`.

pub mod api;
pub mod audit;
pub mod campaign;
pub mod donation;
pub mod user;

pub use api::*;
pub use audit::*;
pub use campaign::*;
pub use donation::*;
pub use user::*;
