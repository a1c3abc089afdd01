//! AmalSAS.id client - typed access to the AmalSAS donation platform
//!
//! Visitors browse fundraising campaigns, signed-in donors pay through a
//! hosted checkout, and administrators manage campaigns. This crate talks to
//! the platform's REST API and exposes those flows as services:
//! - session bootstrap and sign-in with a persisted bearer token
//! - a pure route guard for public, member and admin pages
//! - campaign listing with placeholder fallback, and admin CRUD
//! - donation initiation and gateway result mapping
//! - profile editing, password changes and navbar search
//!
//! ## Architecture
//!
//! - `models/` - Records mirrored from the REST API
//! - `services/` - API client, session store and one service per flow
//! - `handlers/` - Local listener for payment gateway redirects
//! - `utils/` - Locale formatting and route matching
//! - `config/` - Configuration structures and environment loading
//! - `telemetry` - Tracing subscriber setup and log redaction
//! - `cli` - The `amalsas` command line front end
//!
//! ## Quick Start
//!
//! ```no_run
//! use amalsas::{ApiClient, ApiClientConfig, AuthService, MemoryTokenStore, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), amalsas::ClientError> {
//!     let api = ApiClient::new("http://localhost:5050/api/v1", ApiClientConfig::default(), None)?;
//!     let mut session = SessionStore::new(Box::new(MemoryTokenStore::new()));
//!     let auth = AuthService::new(api);
//!     auth.sign_in(&mut session, "budi@example.com", "Rahasia1!").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{ClientConfig, LogConfig, LogFormat, PaymentGatewayConfig};
pub use error::{ClientError, ClientResult};
pub use handlers::{CallbackListener, CallbackResult};
pub use models::{
    AuthAuditEvent, AuthEventOutcome, AuthEventType, Campaign, CampaignListing, CampaignStatus,
    Donation, DonationSummary, ProfileUpdate, User, VersionResponse,
};
pub use services::{
    ApiClient, ApiClientConfig, ApiClientMetrics, ApiError, AuthService, CampaignForm,
    CampaignService, ChangePasswordForm, DataSource, DonationOutcome, DonationService,
    FileTokenStore, FilePart, MemoryTokenStore, Navigation, PaymentOutcome, ProfileService,
    RetryConfig, RouteDecision, RouteTier, SearchResults, SessionAction, SessionState,
    SessionStore, SignUpForm, TokenStore, ValidationError, authorize, reduce, search,
};
pub use telemetry::{init_tracing, redact_sensitive_data};
