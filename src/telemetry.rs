//! Tracing subscriber setup and log redaction.

use std::sync::LazyLock;

use regex::Regex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogConfig, LogFormat};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.default_filter`. Calling this twice is an
/// error from tracing-subscriber, which is returned rather than panicking.
pub fn init_tracing(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?,
    }
    Ok(())
}

struct Redaction {
    pattern: Option<Regex>,
    replacement: &'static str,
}

fn redaction(pattern: &str, replacement: &'static str) -> Redaction {
    Redaction {
        pattern: Regex::new(pattern).ok(),
        replacement,
    }
}

/// Sensitive data patterns to redact
static REDACTIONS: LazyLock<Vec<Redaction>> = LazyLock::new(|| {
    vec![
        redaction(
            r#"(?i)"(password|old_password|new_password|token|secret|authorization)":\s*"[^"]*""#,
            r#""$1": "[REDACTED]""#,
        ),
        // reset links carry the token in the query string
        redaction(r"(?i)([?&]token=)[^&\s]+", "${1}[REDACTED]"),
        redaction(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+", "${1}[REDACTED]"),
        redaction(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b", "[EMAIL]"),
    ]
});

/// Redact credentials and e-mail addresses from text bound for the logs
pub fn redact_sensitive_data(input: &str) -> String {
    REDACTIONS.iter().fold(input.to_string(), |text, r| match &r.pattern {
        Some(re) => re.replace_all(&text, r.replacement).into_owned(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_data_redaction() {
        let input = r#"{"password": "secret123", "email": "user@example.com", "token": "abc123"}"#;
        let redacted = redact_sensitive_data(input);

        assert!(!redacted.contains("secret123"));
        assert!(!redacted.contains("user@example.com"));
        assert!(!redacted.contains("abc123"));
        assert!(redacted.contains(r#""password": "[REDACTED]""#));
    }

    #[test]
    fn test_query_token_redacted() {
        let url = "http://localhost:5050/api/v1/verify-reset-token?token=a1b2c3&lang=id";
        assert_eq!(
            redact_sensitive_data(url),
            "http://localhost:5050/api/v1/verify-reset-token?token=[REDACTED]&lang=id"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(redact_sensitive_data("GET /campaigns"), "GET /campaigns");
    }
}
