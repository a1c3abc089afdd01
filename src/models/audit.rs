//! Audit logging data structures for session and authentication events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Types of authentication events for audit logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    SignInSuccess,
    SignInFailure,
    SessionRestored,
    SessionRejected,
    SignedOut,
    SignUp,
    PasswordChanged,
    PasswordReset,
}

/// Outcomes of authentication events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for authentication events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAuditEvent {
    pub event_type: AuthEventType,
    pub outcome: AuthEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub user_id: Option<String>,
    pub additional_context: Option<String>,
}

impl AuthAuditEvent {
    pub fn new(event_type: AuthEventType, outcome: AuthEventOutcome, endpoint: &str) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            user_id: None,
            additional_context: None,
        }
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.additional_context = context;
        self
    }

    /// Log the audit event using structured logging
    pub fn log(&self) {
        info!(
            target: "auth_audit",
            event_type = ?self.event_type,
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            endpoint = %self.endpoint,
            user_id = ?self.user_id,
            additional_context = ?self.additional_context,
            "Authentication audit event"
        );
    }
}
