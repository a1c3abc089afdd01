//! Payment gateway (Snap checkout) configuration.

use std::env;

/// Configuration for the hosted checkout and the local callback listener
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentGatewayConfig {
    /// Checkout origin, sandbox by default
    pub snap_base_url: String,
    /// Public client key, sent along with the checkout page
    pub client_key: Option<String>,
    /// Address the callback listener binds to while waiting for a result
    pub callback_bind: String,
    /// How long to wait for the gateway to redirect back, in seconds
    pub callback_timeout_seconds: u64,
}

impl Default for PaymentGatewayConfig {
    fn default() -> Self {
        Self {
            snap_base_url: "https://app.sandbox.midtrans.com".to_string(),
            client_key: None,
            callback_bind: "127.0.0.1:5173".to_string(),
            callback_timeout_seconds: 900,
        }
    }
}

impl PaymentGatewayConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let snap_base_url = env::var("AMALSAS_SNAP_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.snap_base_url);

        let client_key = env::var("AMALSAS_SNAP_CLIENT_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let callback_bind = env::var("AMALSAS_PAYMENT_CALLBACK_BIND")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.callback_bind);

        let callback_timeout_seconds = env::var("AMALSAS_PAYMENT_CALLBACK_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.callback_timeout_seconds);

        Self {
            snap_base_url,
            client_key,
            callback_bind,
            callback_timeout_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    #[test]
    fn test_payment_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            env::set_var("AMALSAS_SNAP_BASE_URL", "https://app.midtrans.com");
            env::set_var("AMALSAS_SNAP_CLIENT_KEY", "");
            env::set_var("AMALSAS_PAYMENT_CALLBACK_TIMEOUT", "30");
        }

        let config = PaymentGatewayConfig::from_env();
        assert_eq!(config.snap_base_url, "https://app.midtrans.com");
        assert_eq!(config.client_key, None);
        assert_eq!(config.callback_timeout_seconds, 30);
        assert_eq!(config.callback_bind, "127.0.0.1:5173");

        unsafe {
            env::remove_var("AMALSAS_SNAP_BASE_URL");
            env::remove_var("AMALSAS_SNAP_CLIENT_KEY");
            env::remove_var("AMALSAS_PAYMENT_CALLBACK_TIMEOUT");
        }
    }
}
