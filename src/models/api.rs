//! Response envelopes used by the AmalSAS backend.

use serde::{Deserialize, Serialize};

/// Successful response: `{"code": 200, "data": ...}`.
///
/// Sign-up answers with `{"success", "message", "data", "timestamp"}`
/// instead; both carry the payload under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Error response: `{"code": 400, "message": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Build information printed by the `version` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

impl VersionResponse {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown").to_string(),
            build_time: option_env!("VERGEN_BUILD_TIMESTAMP")
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let coded: ApiEnvelope<i32> = serde_json::from_str(r#"{"code":200,"data":5}"#).unwrap();
        assert_eq!(coded.data, 5);

        let based: ApiEnvelope<i32> = serde_json::from_str(
            r#"{"success":true,"message":"Registration successful!","data":6,"timestamp":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(based.data, 6);
        assert_eq!(based.message.as_deref(), Some("Registration successful!"));
    }

    #[test]
    fn test_version_has_package_version() {
        assert_eq!(VersionResponse::current().version, env!("CARGO_PKG_VERSION"));
    }
}
