//! Client services: the REST client, session handling and one service per
//! user-facing flow.

pub mod api_client;
pub mod auth;
pub mod campaign;
pub mod donation;
pub mod guard;
pub mod payment;
pub mod profile;
pub mod search;
pub mod session;
pub mod token_store;
pub mod validation;

pub use api_client::{ApiClient, ApiClientConfig, ApiClientMetrics, ApiError, FilePart, RetryConfig};
pub use auth::{AuthService, SignUpForm};
pub use campaign::{CampaignForm, CampaignService, DataSource, FormMode, Sourced};
pub use donation::{Checkout, DonationOutcome, DonationService};
pub use guard::{RouteDecision, RouteTier, authorize};
pub use payment::{Navigation, PaymentOutcome};
pub use profile::{ChangePasswordForm, ProfileService};
pub use search::{SearchResults, search};
pub use session::{SessionAction, SessionState, SessionStore, reduce};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
pub use validation::{PasswordStrength, ValidationError};
