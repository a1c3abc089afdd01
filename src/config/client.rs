//! Client-wide configuration: backend location and session persistence.

use std::env;
use std::path::PathBuf;

use super::PaymentGatewayConfig;
use crate::services::api_client::ApiClientConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5050/api/v1";
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://localhost:5050";

/// Top-level configuration for the AmalSAS client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API root, e.g. `http://localhost:5050/api/v1`
    pub api_base_url: String,
    /// Origin serving uploaded images under `/uploads/`
    pub image_base_url: String,
    /// File holding the persisted session token
    pub token_file: PathBuf,
    pub http: ApiClientConfig,
    pub payment: PaymentGatewayConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            token_file: default_token_file(),
            http: ApiClientConfig::default(),
            payment: PaymentGatewayConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let api_base_url = env::var("AMALSAS_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let image_base_url = env::var("AMALSAS_IMAGE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());

        let token_file = env::var("AMALSAS_TOKEN_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_token_file);

        Self {
            api_base_url,
            image_base_url,
            token_file,
            http: ApiClientConfig::from_env(),
            payment: PaymentGatewayConfig::from_env(),
        }
    }
}

/// `$HOME/.amalsas/token.json`, or the working directory when HOME is unset.
fn default_token_file() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".amalsas")
        .join("token.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    #[test]
    fn test_client_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            env::remove_var("AMALSAS_API_BASE_URL");
            env::remove_var("AMALSAS_IMAGE_BASE_URL");
            env::remove_var("AMALSAS_TOKEN_FILE");
        }

        let config = ClientConfig::from_env();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.image_base_url, DEFAULT_IMAGE_BASE_URL);
        assert!(config.token_file.ends_with(".amalsas/token.json"));
    }

    #[test]
    fn test_client_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            env::set_var("AMALSAS_API_BASE_URL", "https://api.amalsas.id/api/v1");
            env::set_var("AMALSAS_TOKEN_FILE", "/tmp/amalsas-test-token.json");
        }

        let config = ClientConfig::from_env();
        assert_eq!(config.api_base_url, "https://api.amalsas.id/api/v1");
        assert_eq!(config.token_file, PathBuf::from("/tmp/amalsas-test-token.json"));

        unsafe {
            env::remove_var("AMALSAS_API_BASE_URL");
            env::remove_var("AMALSAS_TOKEN_FILE");
        }
    }
}
