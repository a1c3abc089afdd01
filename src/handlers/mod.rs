//! HTTP handlers served by the client itself.
//!
//! The only inbound traffic is the payment gateway redirecting the browser
//! back after checkout.

pub mod payment;

pub use payment::{CallbackListener, CallbackResult};
