//! Hosted checkout hand-off and gateway result mapping.
//!
//! The gateway owns the payment. The client only opens the checkout page and
//! turns the result it is redirected back with into a navigation target.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::api_client::ApiError;
use crate::config::PaymentGatewayConfig;

pub const SUCCESS_ROUTE: &str = "/donation-success";
pub const PENDING_ROUTE: &str = "/donation-pending";
pub const CANCELLED_MESSAGE: &str = "Transaksi dibatalkan.";
pub const PAYMENT_ERROR_MESSAGE: &str = "Terjadi kesalahan saat memproses donasi";

/// Result reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum PaymentOutcome {
    Success,
    Pending,
    Cancelled,
    Error(String),
}

/// What the user sees next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Navigate(&'static str),
    Message(String),
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Navigate(route) => write!(f, "-> {route}"),
            Navigation::Message(message) => f.write_str(message),
        }
    }
}

impl PaymentOutcome {
    /// Map a `transaction_status` value from the gateway redirect
    pub fn from_transaction_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "capture" | "settlement" => PaymentOutcome::Success,
            "pending" => PaymentOutcome::Pending,
            "cancel" => PaymentOutcome::Cancelled,
            "deny" | "expire" | "failure" => PaymentOutcome::Error(format!("Transaksi {status}")),
            other => PaymentOutcome::Error(format!("Status transaksi tidak dikenal: {other}")),
        }
    }

    pub fn navigation(&self) -> Navigation {
        match self {
            PaymentOutcome::Success => Navigation::Navigate(SUCCESS_ROUTE),
            PaymentOutcome::Pending => Navigation::Navigate(PENDING_ROUTE),
            PaymentOutcome::Cancelled => Navigation::Message(CANCELLED_MESSAGE.to_string()),
            PaymentOutcome::Error(_) => Navigation::Message(PAYMENT_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Query parameters the gateway appends to its finish/unfinish/error redirects
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewayRedirect {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
}

/// Which redirect the gateway used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Finish,
    Unfinish,
    Error,
}

impl GatewayRedirect {
    pub fn outcome(&self, kind: RedirectKind) -> PaymentOutcome {
        match (&self.transaction_status, kind) {
            (Some(status), _) if !status.trim().is_empty() => {
                PaymentOutcome::from_transaction_status(status)
            }
            (_, RedirectKind::Finish) => PaymentOutcome::Success,
            (_, RedirectKind::Unfinish) => PaymentOutcome::Cancelled,
            (_, RedirectKind::Error) => PaymentOutcome::Error(
                self.status_code
                    .clone()
                    .map(|code| format!("Gateway status {code}"))
                    .unwrap_or_else(|| "Gateway error".to_string()),
            ),
        }
    }
}

/// Build the hosted checkout URL.
///
/// Newer backends return the gateway's redirect URL directly; older ones
/// return the bare Snap token, which is appended to the redirection path.
pub fn checkout_url(config: &PaymentGatewayConfig, payment_url: &str) -> Result<Url, ApiError> {
    let payment_url = payment_url.trim();
    if payment_url.is_empty() {
        return Err(ApiError::Decode("empty payment_url".to_string()));
    }
    if payment_url.starts_with("http") {
        return Url::parse(payment_url).map_err(|e| ApiError::InvalidUrl(format!("{payment_url}: {e}")));
    }

    let base = config.snap_base_url.trim_end_matches('/');
    let raw = format!("{base}/snap/v4/redirection/{payment_url}");
    Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_status_mapping() {
        assert_eq!(PaymentOutcome::from_transaction_status("settlement"), PaymentOutcome::Success);
        assert_eq!(PaymentOutcome::from_transaction_status("capture"), PaymentOutcome::Success);
        assert_eq!(PaymentOutcome::from_transaction_status("PENDING"), PaymentOutcome::Pending);
        assert_eq!(PaymentOutcome::from_transaction_status("cancel"), PaymentOutcome::Cancelled);
        assert!(matches!(
            PaymentOutcome::from_transaction_status("expire"),
            PaymentOutcome::Error(_)
        ));
    }

    #[test]
    fn test_navigation_targets() {
        assert_eq!(PaymentOutcome::Success.navigation(), Navigation::Navigate("/donation-success"));
        assert_eq!(PaymentOutcome::Pending.navigation(), Navigation::Navigate("/donation-pending"));
        assert_eq!(
            PaymentOutcome::Cancelled.navigation(),
            Navigation::Message("Transaksi dibatalkan.".to_string())
        );
    }

    #[test]
    fn test_redirect_without_status_uses_kind() {
        let bare = GatewayRedirect::default();
        assert_eq!(bare.outcome(RedirectKind::Finish), PaymentOutcome::Success);
        assert_eq!(bare.outcome(RedirectKind::Unfinish), PaymentOutcome::Cancelled);

        let pending = GatewayRedirect {
            transaction_status: Some("pending".into()),
            ..Default::default()
        };
        assert_eq!(pending.outcome(RedirectKind::Finish), PaymentOutcome::Pending);
    }

    #[test]
    fn test_checkout_url() {
        let config = PaymentGatewayConfig::default();
        let direct = checkout_url(&config, "https://app.sandbox.midtrans.com/snap/v4/redirection/abc").unwrap();
        assert_eq!(direct.as_str(), "https://app.sandbox.midtrans.com/snap/v4/redirection/abc");

        let from_token = checkout_url(&config, "tok-123").unwrap();
        assert_eq!(
            from_token.as_str(),
            "https://app.sandbox.midtrans.com/snap/v4/redirection/tok-123"
        );

        assert!(checkout_url(&config, "  ").is_err());
    }
}
