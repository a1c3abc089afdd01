//! Donation data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{campaign::Campaign, user::User};

/// A donation record. Payment status is owned by the backend; the client
/// never reconciles it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub amount: f64,
    /// Payment status as recorded server side (`pending`, `paid`, ...)
    #[serde(default, alias = "status_payment")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    #[serde(default)]
    pub campaign_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<Box<Campaign>>,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub payment_url: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Donation {
    /// Owner id, taken from the embedded user when the flat field is unset.
    pub fn owner_id(&self) -> i64 {
        if self.user_id != 0 {
            return self.user_id;
        }
        self.user.as_ref().map(|u| u.id).unwrap_or_default()
    }

    /// Campaign title for list views, if the backend embedded it.
    pub fn campaign_title(&self) -> Option<&str> {
        self.campaign.as_deref().map(|c| c.title.as_str())
    }
}

/// Body of `POST /donations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationCreateRequest {
    pub amount: f64,
    pub status: String,
    pub user_id: i64,
    pub campaign_id: i64,
}

/// Data returned by `POST /donations`.
#[derive(Debug, Clone, Deserialize)]
pub struct DonationCreated {
    #[serde(default)]
    pub donation: Donation,
    /// Gateway redirect URL, or a bare checkout token on older backends
    pub payment_url: String,
}

/// Payload of `GET /donations/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationSummary {
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default)]
    pub total_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_id_prefers_flat_field() {
        let d: Donation = serde_json::from_str(r#"{"id":1,"user_id":0,"user":{"id":9}}"#).unwrap();
        assert_eq!(d.owner_id(), 9);

        let d: Donation = serde_json::from_str(r#"{"id":1,"user_id":4,"user":{"id":9}}"#).unwrap();
        assert_eq!(d.owner_id(), 4);
    }

    #[test]
    fn test_status_payment_alias() {
        let d: Donation = serde_json::from_str(r#"{"status_payment":"paid"}"#).unwrap();
        assert_eq!(d.status, "paid");
    }
}
