//! Campaign data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{donation::Donation, user::User};

/// Lifecycle status of a campaign.
///
/// The backend stores free text; values are matched case-insensitively and
/// anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CampaignStatus {
    Active,
    Inactive,
    Completed,
    Other(String),
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Active
    }
}

impl From<String> for CampaignStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => CampaignStatus::Active,
            "inactive" => CampaignStatus::Inactive,
            "completed" => CampaignStatus::Completed,
            _ => CampaignStatus::Other(value),
        }
    }
}

impl From<CampaignStatus> for String {
    fn from(status: CampaignStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Active => f.write_str("active"),
            CampaignStatus::Inactive => f.write_str("inactive"),
            CampaignStatus::Completed => f.write_str("completed"),
            CampaignStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// A fundraising campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Payout account (bank account or e-wallet)
    #[serde(default)]
    pub cpocket: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub target_total: f64,
    #[serde(default)]
    pub total_collected: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub donations: Vec<Donation>,
}

impl Campaign {
    /// Organiser name, preferring the flattened `user_name`.
    pub fn organiser(&self) -> String {
        if !self.user_name.is_empty() {
            return self.user_name.clone();
        }
        self.user
            .as_ref()
            .map(User::display_name)
            .unwrap_or_default()
    }
}

/// Payload of `GET /campaigns`: the list plus backend-computed aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignListing {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub total_campaigns: u64,
    #[serde(default)]
    pub total_collected: f64,
    #[serde(default)]
    pub total_transactions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_case_insensitive() {
        let c: Campaign = serde_json::from_str(r#"{"id":1,"status":"Active"}"#).unwrap();
        assert_eq!(c.status, CampaignStatus::Active);

        let c: Campaign = serde_json::from_str(r#"{"id":1,"status":"paused"}"#).unwrap();
        assert_eq!(c.status, CampaignStatus::Other("paused".into()));
        assert_eq!(c.status.to_string(), "paused");
    }

    #[test]
    fn test_decodes_backend_campaign() {
        let json = r#"{
            "id": 3, "title": "Donasi Darurat", "description": "Bantuan",
            "details": "", "start": "2025-01-01T00:00:00Z", "end": "2025-12-31T00:00:00Z",
            "cpocket": "Mandiri 456789123", "status": "active", "photo": "uploads/a.jpg",
            "target_total": 100000000, "total_collected": 92714567, "category": "sosial",
            "location": "Jakarta", "user_id": 1,
            "user": {"id": 1, "first_name": "Admin", "last_name": "", "isAdmin": true},
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let c: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(c.total_collected, 92_714_567.0);
        assert_eq!(c.organiser(), "Admin");
        assert!(c.end.unwrap() > c.start.unwrap());
    }
}
