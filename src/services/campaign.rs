//! Campaign listing, detail and admin CRUD.
//!
//! Read-only views fall back to built-in placeholder campaigns when the
//! backend is unreachable or empty. Writes never fall back: their failures
//! surface the server's message.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::api_client::{ApiClient, FilePart, MultipartBody, RequestBody, with_query};
use super::validation::ValidationError;
use crate::error::{ClientError, ClientResult};
use crate::models::{Campaign, CampaignListing, CampaignStatus, Donation};
use crate::utils::format::{date_input_value, percent_of_target, remaining_days};

pub const PRESET_CATEGORIES: [&str; 4] = ["pendidikan", "kesehatan", "sosial", "bencana"];
pub const OTHER_CATEGORY: &str = "lainnya";

pub const CREATE_FAILED: &str = "Gagal membuat campaign";
pub const UPDATE_FAILED: &str = "Gagal memperbarui campaign";
pub const LOAD_FAILED: &str = "Gagal memuat data campaign";

/// Where a read came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Backend,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

/// Admin campaign form, as typed in.
///
/// Dates are `YYYY-MM-DD`. `category` is one of the presets or
/// [`OTHER_CATEGORY`], in which case `custom_category` carries the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    pub details: String,
    pub start: String,
    pub end: String,
    pub target_total: f64,
    pub category: String,
    pub custom_category: String,
    pub location: String,
    pub cpocket: String,
    pub status: CampaignStatus,
    pub photo: Option<FilePart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// A form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCampaign {
    pub title: String,
    pub description: String,
    pub details: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target_total: f64,
    pub category: String,
    pub location: String,
    pub cpocket: String,
    pub status: CampaignStatus,
    pub photo: Option<FilePart>,
}

impl CampaignForm {
    /// Prefill an edit form from an existing campaign
    pub fn from_campaign(campaign: &Campaign) -> Self {
        let (category, custom_category) =
            if PRESET_CATEGORIES.contains(&campaign.category.as_str()) || campaign.category.is_empty() {
                (campaign.category.clone(), String::new())
            } else {
                (OTHER_CATEGORY.to_string(), campaign.category.clone())
            };

        Self {
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            details: campaign.details.clone(),
            start: date_input_value(campaign.start),
            end: date_input_value(campaign.end),
            target_total: campaign.target_total,
            category,
            custom_category,
            location: campaign.location.clone(),
            cpocket: campaign.cpocket.clone(),
            status: campaign.status.clone(),
            photo: None,
        }
    }

    /// The category sent to the backend
    pub fn effective_category(&self) -> &str {
        if self.category == OTHER_CATEGORY {
            self.custom_category.trim()
        } else {
            self.category.trim()
        }
    }

    /// Checks run in a fixed order: custom category, dates, target, image.
    pub fn validate(&self, mode: FormMode) -> Result<ValidatedCampaign, ValidationError> {
        if self.category == OTHER_CATEGORY && self.custom_category.trim().is_empty() {
            return Err(ValidationError::CustomCategoryRequired);
        }

        let start = parse_date(&self.start)?;
        let end = parse_date(&self.end)?;
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }

        if !self.target_total.is_finite() || self.target_total <= 0.0 {
            return Err(ValidationError::TargetNotPositive);
        }

        if mode == FormMode::Create && self.photo.is_none() {
            return Err(ValidationError::ImageRequired);
        }

        Ok(ValidatedCampaign {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            details: self.details.clone(),
            start,
            end,
            target_total: self.target_total,
            category: self.effective_category().to_string(),
            location: self.location.trim().to_string(),
            cpocket: self.cpocket.trim().to_string(),
            status: self.status.clone(),
            photo: self.photo.clone(),
        })
    }
}

impl ValidatedCampaign {
    /// Multipart when a photo is attached, JSON otherwise
    pub fn into_body(self) -> RequestBody {
        match self.photo {
            Some(photo) => {
                let form = MultipartBody::default()
                    .text("title", self.title)
                    .text("description", self.description)
                    .text("details", self.details)
                    .text("start", self.start.format("%Y-%m-%d").to_string())
                    .text("end", self.end.format("%Y-%m-%d").to_string())
                    .text("cpocket", self.cpocket)
                    .text("status", self.status.to_string())
                    .text("target_total", self.target_total.to_string())
                    .text("category", self.category)
                    .text("location", self.location)
                    .with_file(FilePart {
                        field: "photo".to_string(),
                        ..photo
                    });
                RequestBody::Multipart(form)
            }
            None => RequestBody::Json(json!({
                "title": self.title,
                "description": self.description,
                "details": self.details,
                "start": midnight_utc(self.start),
                "end": midnight_utc(self.end),
                "cpocket": self.cpocket,
                "status": self.status.to_string(),
                "target_total": self.target_total,
                "category": self.category,
                "location": self.location,
            })),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Progress figures shown on the detail page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CampaignProgress {
    pub collected: f64,
    pub target: f64,
    pub percent: f64,
    pub remaining_days: i64,
}

pub fn progress(campaign: &Campaign, now: DateTime<Utc>) -> CampaignProgress {
    CampaignProgress {
        collected: campaign.total_collected,
        target: campaign.target_total,
        percent: percent_of_target(campaign.total_collected, campaign.target_total),
        remaining_days: remaining_days(campaign.end, now),
    }
}

/// Campaign service
#[derive(Debug, Clone)]
pub struct CampaignService {
    api: ApiClient,
}

impl CampaignService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Home page listing. Never fails: an unreachable or empty backend
    /// yields the placeholder campaigns with zero totals.
    pub async fn list(&self) -> Sourced<CampaignListing> {
        match self.api.get::<CampaignListing>("/campaigns").await {
            Ok(listing) if !listing.campaigns.is_empty() => Sourced {
                value: listing,
                source: DataSource::Backend,
            },
            Ok(_) => {
                info!("Backend returned no campaigns, showing placeholders");
                placeholder_listing()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch campaigns, showing placeholders");
                placeholder_listing()
            }
        }
    }

    /// Campaign detail, falling back to a placeholder with the same id
    pub async fn get(&self, id: i64) -> ClientResult<Sourced<Campaign>> {
        match self.api.get::<Campaign>(&format!("/campaigns/{id}")).await {
            Ok(campaign) => Ok(Sourced {
                value: campaign,
                source: DataSource::Backend,
            }),
            Err(e) => {
                warn!(campaign_id = id, error = %e, "Failed to fetch campaign, trying placeholder");
                placeholder_detail(id)
                    .map(|value| Sourced {
                        value,
                        source: DataSource::Placeholder,
                    })
                    .ok_or_else(|| ClientError::NotFound(format!("Campaign {id}")))
            }
        }
    }

    /// Load an existing campaign into an edit form. No placeholder fallback.
    pub async fn edit_form(&self, id: i64) -> ClientResult<CampaignForm> {
        let campaign: Campaign = self.api.get(&format!("/campaigns/{id}")).await?;
        Ok(CampaignForm::from_campaign(&campaign))
    }

    pub async fn filter(&self, category: Option<&str>, location: Option<&str>) -> ClientResult<Vec<Campaign>> {
        let mut pairs = Vec::new();
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            pairs.push(("category", category));
        }
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            pairs.push(("location", location));
        }
        let campaigns: Option<Vec<Campaign>> =
            self.api.get(&with_query("/campaigns/filter", &pairs)).await?;
        Ok(campaigns.unwrap_or_default())
    }

    pub async fn create(&self, form: &CampaignForm) -> ClientResult<Campaign> {
        let body = form.validate(FormMode::Create)?.into_body();
        let campaign: Campaign = self
            .api
            .send(reqwest::Method::POST, "/campaigns/add", body)
            .await?;
        info!(campaign_id = campaign.id, "Campaign created");
        Ok(campaign)
    }

    pub async fn update(&self, id: i64, form: &CampaignForm) -> ClientResult<Campaign> {
        let body = form.validate(FormMode::Edit)?.into_body();
        let campaign: Campaign = self
            .api
            .send(reqwest::Method::PUT, &format!("/campaigns/edit/{id}"), body)
            .await?;
        info!(campaign_id = id, "Campaign updated");
        Ok(campaign)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let _: Option<Value> = self.api.delete(&format!("/campaigns/{id}")).await?;
        info!(campaign_id = id, "Campaign deleted");
        Ok(())
    }

    pub async fn upload_photo(&self, id: i64, photo: FilePart) -> ClientResult<Option<Value>> {
        let body = MultipartBody::default().with_file(FilePart {
            field: "photo".to_string(),
            ..photo
        });
        let result = self
            .api
            .send(
                reqwest::Method::POST,
                &format!("/campaigns/{id}/upload-photo"),
                RequestBody::Multipart(body),
            )
            .await?;
        info!(campaign_id = id, "Campaign photo uploaded");
        Ok(result)
    }

    pub async fn donations(&self, id: i64) -> ClientResult<Vec<Donation>> {
        let donations: Option<Vec<Donation>> =
            self.api.get(&format!("/campaigns/{id}/donations")).await?;
        Ok(donations.unwrap_or_default())
    }
}

fn at(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[allow(clippy::too_many_arguments)]
fn placeholder(
    id: i64,
    title: &str,
    description: &str,
    start: &str,
    end: &str,
    cpocket: &str,
    photo: &str,
    total_collected: f64,
    user_id: i64,
    user_name: &str,
) -> Campaign {
    Campaign {
        id,
        title: title.to_string(),
        description: description.to_string(),
        start: at(start),
        end: at(end),
        cpocket: cpocket.to_string(),
        status: CampaignStatus::Active,
        photo: photo.to_string(),
        total_collected,
        user_id,
        user_name: user_name.to_string(),
        created_at: at(start),
        ..Default::default()
    }
}

/// Campaigns shown on the home page when the backend has none
pub fn placeholder_campaigns() -> Vec<Campaign> {
    vec![
        placeholder(
            1,
            "Jum'at Berkah",
            "Membantu yang membutuhkan",
            "2025-06-01T00:00:00Z",
            "2025-07-01T00:00:00Z",
            "BCA 12345678 a.n AmalSAS",
            "https://via.placeholder.com/600x300?text=Jumat+Berkah",
            2_500_000.0,
            1,
            "Admin",
        ),
        placeholder(
            2,
            "Wakaf Qurban untuk Daerah Terpencil",
            "Distribusi hewan qurban ke daerah yang jarang tersentuh bantuan",
            "2025-05-15T00:00:00Z",
            "2025-07-15T00:00:00Z",
            "BRI 987654321 a.n Yayasan Amal",
            "https://via.placeholder.com/600x300?text=Wakaf+Qurban",
            12_500_000.0,
            2,
            "AdminQurban",
        ),
        placeholder(
            3,
            "Donasi Darurat Kemanusiaan Palestina",
            "Bantuan kemanusiaan untuk korban terdampak konflik di Palestina",
            "2025-01-01T00:00:00Z",
            "2025-12-31T00:00:00Z",
            "Mandiri 456789123 a.n SAS Donasi",
            "https://via.placeholder.com/600x300?text=Palestina",
            92_714_567.0,
            1,
            "Admin",
        ),
    ]
}

/// Totals are left at zero; they only ever come from the backend.
fn placeholder_listing() -> Sourced<CampaignListing> {
    Sourced {
        value: CampaignListing {
            campaigns: placeholder_campaigns(),
            ..Default::default()
        },
        source: DataSource::Placeholder,
    }
}

/// Detail page placeholder for `id`, if one exists
pub fn placeholder_detail(id: i64) -> Option<Campaign> {
    let nicu = placeholder(
        1,
        "Wakaf Inkubator untuk Bayi Kritis di NICU",
        "Wakaf Alat Kesehatan, Selamatkan Hidup Bayi di NICU",
        "2025-06-01T00:00:00Z",
        "2025-08-31T00:00:00Z",
        "BCA 12345678 a.n AmalSAS",
        "https://via.placeholder.com/600x400?text=Inkubator+NICU",
        40_182_010.0,
        1,
        "AmalSAS Foundation",
    );
    (nicu.id == id).then_some(nicu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CampaignForm {
        CampaignForm {
            title: "Sumur Bor".into(),
            description: "Air bersih".into(),
            details: "Detail".into(),
            start: "2025-06-01".into(),
            end: "2025-07-01".into(),
            target_total: 10_000_000.0,
            category: "sosial".into(),
            location: "NTT".into(),
            cpocket: "BCA 1".into(),
            photo: Some(FilePart::new("file", "sumur.jpg", vec![1, 2, 3])),
            ..Default::default()
        }
    }

    #[test]
    fn test_validation_order() {
        // every rule broken: the custom category is reported first
        let broken = CampaignForm {
            category: OTHER_CATEGORY.into(),
            end: "2025-05-01".into(),
            target_total: 0.0,
            photo: None,
            ..form()
        };
        assert_eq!(
            broken.validate(FormMode::Create).unwrap_err(),
            ValidationError::CustomCategoryRequired
        );

        let broken = CampaignForm {
            custom_category: "Lingkungan".into(),
            ..broken
        };
        assert_eq!(
            broken.validate(FormMode::Create).unwrap_err(),
            ValidationError::EndNotAfterStart
        );

        let broken = CampaignForm {
            end: "2025-07-01".into(),
            ..broken
        };
        assert_eq!(
            broken.validate(FormMode::Create).unwrap_err(),
            ValidationError::TargetNotPositive
        );

        for target in [f64::INFINITY, f64::NAN, -5.0] {
            let broken = CampaignForm {
                target_total: target,
                ..broken.clone()
            };
            assert_eq!(
                broken.validate(FormMode::Create).unwrap_err(),
                ValidationError::TargetNotPositive
            );
        }

        let broken = CampaignForm {
            target_total: 1.0,
            ..broken
        };
        assert_eq!(
            broken.validate(FormMode::Create).unwrap_err(),
            ValidationError::ImageRequired
        );
        assert!(broken.validate(FormMode::Edit).is_ok());
    }

    #[test]
    fn test_same_day_end_is_rejected() {
        let same_day = CampaignForm {
            end: "2025-06-01".into(),
            ..form()
        };
        assert_eq!(
            same_day.validate(FormMode::Edit).unwrap_err(),
            ValidationError::EndNotAfterStart
        );
    }

    #[test]
    fn test_custom_category_is_sent() {
        let custom = CampaignForm {
            category: OTHER_CATEGORY.into(),
            custom_category: " Lingkungan ".into(),
            ..form()
        };
        let validated = custom.validate(FormMode::Create).unwrap();
        assert_eq!(validated.category, "Lingkungan");
    }

    #[test]
    fn test_body_encoding_depends_on_photo() {
        let RequestBody::Multipart(parts) = form().validate(FormMode::Create).unwrap().into_body() else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.field("start"), Some("2025-06-01"));
        assert_eq!(parts.field("target_total"), Some("10000000"));
        assert_eq!(parts.file.as_ref().map(|f| f.field.as_str()), Some("photo"));

        let no_photo = CampaignForm {
            photo: None,
            ..form()
        };
        let RequestBody::Json(body) = no_photo.validate(FormMode::Edit).unwrap().into_body() else {
            panic!("expected json body");
        };
        assert_eq!(body["start"], "2025-06-01T00:00:00Z");
        assert_eq!(body["status"], "active");
    }

    #[test]
    fn test_edit_prefill() {
        let campaign = Campaign {
            start: at("2025-06-01T08:00:00Z"),
            end: at("2025-07-01T00:00:00Z"),
            category: "Lingkungan".into(),
            ..Default::default()
        };
        let prefill = CampaignForm::from_campaign(&campaign);
        assert_eq!(prefill.start, "2025-06-01");
        assert_eq!(prefill.end, "2025-07-01");
        assert_eq!(prefill.category, OTHER_CATEGORY);
        assert_eq!(prefill.custom_category, "Lingkungan");
    }

    #[test]
    fn test_placeholders() {
        let listing = placeholder_listing();
        assert_eq!(listing.source, DataSource::Placeholder);
        assert_eq!(listing.value.campaigns.len(), 3);
        assert_eq!(listing.value.total_collected, 0.0);
        assert!(placeholder_detail(1).is_some());
        assert!(placeholder_detail(2).is_none());
    }

    #[test]
    fn test_progress() {
        let campaign = Campaign {
            target_total: 3.0,
            total_collected: 1.0,
            end: at("2025-06-03T00:00:00Z"),
            ..Default::default()
        };
        let now = at("2025-06-01T12:00:00Z").unwrap();
        let p = progress(&campaign, now);
        assert_eq!(p.percent, 33.33);
        assert_eq!(p.remaining_days, 2);
    }
}
