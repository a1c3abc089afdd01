//! Client-side form validation.
//!
//! Every check here runs before a request is built, so a rejected form never
//! reaches the network. The `Display` text of [`ValidationError`] is what the
//! user sees.

use std::sync::LazyLock;

use regex::Regex;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{3,20}$").expect("username pattern"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("phone pattern"));

const PASSWORD_SPECIALS: &str = "!@#$%^&*";
pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 72;

/// Reasons a form is rejected locally
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Harap isi {0}")]
    Required(&'static str),

    #[error("Nama minimal 2 karakter")]
    NameTooShort,

    #[error("3-20 karakter alfanumerik saja")]
    InvalidUsername,

    #[error("Harap masukkan email yang valid")]
    InvalidEmail,

    #[error("Harap masukkan nomor telepon yang valid")]
    InvalidPhone,

    #[error("Password harus memenuhi persyaratan kompleksitas")]
    WeakPassword,

    #[error("Password tidak cocok")]
    PasswordConfirmationMismatch,

    #[error("New passwords don't match!")]
    NewPasswordMismatch,

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Harap masukkan kategori lainnya")]
    CustomCategoryRequired,

    #[error("Tanggal berakhir harus setelah tanggal mulai")]
    EndNotAfterStart,

    #[error("Tanggal tidak valid: {0}")]
    InvalidDate(String),

    #[error("Target total harus lebih besar dari nol")]
    TargetNotPositive,

    #[error("Gambar campaign wajib diunggah")]
    ImageRequired,

    #[error("Masukkan jumlah donasi yang valid.")]
    InvalidDonationAmount,
}

/// Individual password requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecks {
    pub min_length: bool,
    pub has_uppercase: bool,
    pub has_number: bool,
    pub has_special: bool,
}

impl PasswordChecks {
    pub fn of(password: &str) -> Self {
        Self {
            min_length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_number: password.chars().any(|c| c.is_ascii_digit()),
            has_special: password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
        }
    }

    pub fn satisfied(&self) -> usize {
        [
            self.min_length,
            self.has_uppercase,
            self.has_number,
            self.has_special,
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }

    pub fn is_valid(&self) -> bool {
        self.satisfied() == 4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordStrength::Weak => f.write_str("weak"),
            PasswordStrength::Medium => f.write_str("medium"),
            PasswordStrength::Strong => f.write_str("strong"),
        }
    }
}

pub fn password_strength(password: &str) -> PasswordStrength {
    match PasswordChecks::of(password).satisfied() {
        4 => PasswordStrength::Strong,
        2 | 3 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    }
}

/// Full sign-up complexity rule: all four checks and at most 72 characters
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() > MAX_PASSWORD_LENGTH || !PasswordChecks::of(password).is_valid() {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername)
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.len() <= 100 && EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Strip whitespace and make sure the number carries a leading `+`.
pub fn normalize_phone(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.starts_with('+') {
        compact
    } else {
        format!("+{compact}")
    }
}

/// Validate an already normalised phone number (E.164 shape)
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn require(value: &str, label: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(label))
    } else {
        Ok(())
    }
}

/// Parse a donation amount. Accepts plain numbers and `id-ID` grouped
/// input such as `50.000`.
///
/// A single dot followed by exactly three digits is read as a thousands
/// separator, so `12.500` is 12500 rupiah, not 12.5. Use a comma for a
/// decimal part in that position (`12,5`). This differs from a plain decimal
/// parse on purpose.
pub fn parse_donation_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let direct = trimmed.parse::<f64>().ok();
    let grouped = || {
        let bare = trimmed.replace('.', "").replace(',', ".");
        bare.parse::<f64>().ok()
    };
    let looks_grouped = trimmed.matches('.').count() > 1
        || trimmed
            .rsplit_once('.')
            .is_some_and(|(_, tail)| tail.len() == 3 && !trimmed.contains(','));

    let amount = if looks_grouped { grouped() } else { direct.or_else(grouped) };

    match amount {
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidDonationAmount),
    }
}
