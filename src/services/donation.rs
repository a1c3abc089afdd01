//! Donation initiation and donation history.

use tracing::info;
use url::Url;

use super::api_client::ApiClient;
use super::payment::checkout_url;
use super::session::SessionState;
use super::validation::parse_donation_amount;
use crate::config::PaymentGatewayConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{Donation, DonationCreateRequest, DonationCreated, DonationSummary};

/// A donation waiting for payment at the gateway
#[derive(Debug, Clone)]
pub struct Checkout {
    pub donation: Donation,
    pub payment_url: String,
    pub checkout_url: Url,
}

#[derive(Debug, Clone)]
pub enum DonationOutcome {
    /// Anonymous visitor: show the sign-in prompt, nothing was sent
    SignInRequired,
    Checkout(Checkout),
}

#[derive(Debug, Clone)]
pub struct DonationService {
    api: ApiClient,
    gateway: PaymentGatewayConfig,
}

impl DonationService {
    pub fn new(api: ApiClient, gateway: PaymentGatewayConfig) -> Self {
        Self { api, gateway }
    }

    /// Start a donation to `campaign_id`.
    ///
    /// The session is checked before the amount, and both before any request.
    pub async fn initiate(
        &self,
        session: &SessionState,
        campaign_id: i64,
        amount: &str,
    ) -> ClientResult<DonationOutcome> {
        let Some(user_id) = session.user_id() else {
            return Ok(DonationOutcome::SignInRequired);
        };
        let amount = parse_donation_amount(amount)?;

        let request = DonationCreateRequest {
            amount,
            status: "pending".to_string(),
            user_id,
            campaign_id,
        };
        let created: DonationCreated = self.api.post_json("/donations", &request).await?;
        let checkout_url = checkout_url(&self.gateway, &created.payment_url)?;

        info!(
            campaign_id,
            user_id,
            amount,
            order_id = %created.donation.order_id,
            "Donation created, handing off to checkout"
        );

        Ok(DonationOutcome::Checkout(Checkout {
            donation: created.donation,
            payment_url: created.payment_url,
            checkout_url,
        }))
    }

    /// Donations made by the signed-in user
    pub async fn my_donations(&self, session: &SessionState) -> ClientResult<Vec<Donation>> {
        let user_id = session.user_id().ok_or(ClientError::NotSignedIn)?;
        let donations: Option<Vec<Donation>> =
            self.api.get(&format!("/donations/by-user/{user_id}")).await?;
        Ok(donations.unwrap_or_default())
    }

    /// Every donation on the platform (admin)
    pub async fn all_donations(&self) -> ClientResult<Vec<Donation>> {
        let donations: Option<Vec<Donation>> = self.api.get("/donations/admin/all").await?;
        Ok(donations.unwrap_or_default())
    }

    pub async fn summary(&self) -> ClientResult<DonationSummary> {
        Ok(self.api.get("/donations/summary").await?)
    }
}
