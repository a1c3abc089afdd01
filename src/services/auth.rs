//! Authentication flows: sign-in, sign-up, session bootstrap and password
//! reset.

use serde_json::Value;
use tracing::{info, warn};

use super::api_client::{ApiClient, ApiError, with_query};
use super::session::{SessionAction, SessionStore};
use super::validation::{self, ValidationError};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AuthAuditEvent, AuthEventOutcome, AuthEventType, ForgotPasswordRequest, ResetPasswordRequest,
    SignInData, SignInRequest, SignUpRequest, User,
};

/// Input of the sign-up form before normalisation
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    /// Check the form and build the request body. Runs before any request.
    pub fn validate(&self) -> Result<SignUpRequest, ValidationError> {
        validation::require(&self.first_name, "nama depan")?;
        validation::require(&self.last_name, "nama belakang")?;
        if self.first_name.trim().chars().count() < 2 || self.last_name.trim().chars().count() < 2 {
            return Err(ValidationError::NameTooShort);
        }
        validation::validate_username(self.username.trim())?;
        validation::validate_email(&self.email)?;
        let phone = validation::normalize_phone(&self.phone);
        validation::validate_phone(&phone)?;
        validation::require(&self.address, "alamat")?;
        validation::validate_password(&self.password)?;

        Ok(SignUpRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            username: self.username.trim().to_string(),
            phone,
            address: self.address.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            is_admin: false,
        })
    }
}

/// Which kind of identifier a sign-in used, without the identifier itself
fn identifier_kind(value: &str) -> &'static str {
    if value.contains('@') { "email" } else { "username" }
}

/// Authentication service
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Restore the session from the stored token.
    ///
    /// No stored token, an unreadable token file, or a rejected token all end
    /// in `AuthError` and a signed-out state. Returns whether a session was
    /// restored.
    pub async fn check_auth(&self, session: &mut SessionStore) -> ClientResult<bool> {
        let stored = match session.stored_token() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Stored session token unreadable");
                AuthAuditEvent::new(
                    AuthEventType::SessionRejected,
                    AuthEventOutcome::Failure,
                    "token_store",
                )
                .with_context(Some(e.to_string()))
                .log();
                None
            }
        };
        let Some(token) = stored else {
            self.reset_session(session);
            return Ok(false);
        };

        self.api.set_auth_token(Some(&token));
        match self.api.get::<User>("/check-auth").await {
            Ok(mut user) => {
                user.token = token;
                let user_id = user.id;
                session.dispatch(SessionAction::UserSuccess(user))?;
                AuthAuditEvent::new(
                    AuthEventType::SessionRestored,
                    AuthEventOutcome::Success,
                    "/check-auth",
                )
                .with_user_id(Some(user_id.to_string()))
                .log();
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Stored session rejected");
                AuthAuditEvent::new(
                    AuthEventType::SessionRejected,
                    AuthEventOutcome::Failure,
                    "/check-auth",
                )
                .with_context(Some(e.to_string()))
                .log();
                self.reset_session(session);
                Ok(false)
            }
        }
    }

    /// Drop the bearer token and move to the signed-out state. A token file
    /// that cannot be removed is logged by `dispatch` and otherwise ignored.
    fn reset_session(&self, session: &mut SessionStore) {
        self.api.set_auth_token(None);
        let _ = session.dispatch(SessionAction::AuthError);
    }

    /// Sign in with an e-mail or username
    pub async fn sign_in(
        &self,
        session: &mut SessionStore,
        value: &str,
        password: &str,
    ) -> ClientResult<User> {
        validation::require(value, "email atau username")?;
        validation::require(password, "password")?;

        let request = SignInRequest {
            value: value.trim().to_string(),
            password: password.to_string(),
        };

        let data: SignInData = match self.api.post_json("/signin", &request).await {
            Ok(data) => data,
            Err(e) => {
                AuthAuditEvent::new(
                    AuthEventType::SignInFailure,
                    AuthEventOutcome::Failure,
                    "/signin",
                )
                .with_context(Some(format!("identifier_kind={}", identifier_kind(&request.value))))
                .log();
                return Err(e.into());
            }
        };

        let mut user = data.user;
        if user.token.is_empty() {
            user.token = data.token.clone();
        }
        self.api.set_auth_token(Some(&data.token));
        session.dispatch(SessionAction::LoginSuccess(user.clone()))?;

        AuthAuditEvent::new(
            AuthEventType::SignInSuccess,
            AuthEventOutcome::Success,
            "/signin",
        )
        .with_user_id(Some(user.id.to_string()))
        .log();
        info!(user_id = user.id, is_admin = user.is_admin, "Signed in");
        Ok(user)
    }

    /// Register a donor account. Does not sign in.
    pub async fn sign_up(&self, form: &SignUpForm) -> ClientResult<String> {
        let request = form.validate()?;
        let _: Option<Value> = self.api.post_json("/signup", &request).await?;

        AuthAuditEvent::new(AuthEventType::SignUp, AuthEventOutcome::Success, "/signup").log();
        Ok("Registrasi berhasil! Silakan masuk.".to_string())
    }

    pub fn sign_out(&self, session: &mut SessionStore) -> ClientResult<()> {
        let user_id = session.state().user_id();
        self.api.set_auth_token(None);
        session.dispatch(SessionAction::Logout)?;
        AuthAuditEvent::new(AuthEventType::SignedOut, AuthEventOutcome::Success, "logout")
            .with_user_id(user_id.map(|id| id.to_string()))
            .log();
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        validation::validate_email(email)?;
        let request = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        let _: Option<Value> = self.api.post_json("/forgot-password", &request).await?;
        info!("Password reset link requested");
        Ok(())
    }

    /// Ask the backend whether a reset token is still usable
    pub async fn verify_reset_token(&self, token: &str) -> ClientResult<bool> {
        validation::require(token, "token")?;
        let path = with_query("/verify-reset-token", &[("token", token)]);

        match self.api.get::<Option<Value>>(&path).await {
            Ok(_) => Ok(true),
            Err(ApiError::Status { status, .. }) if (400..500).contains(&status) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirm: &str,
    ) -> ClientResult<()> {
        validation::require(token, "token")?;
        if password != confirm {
            return Err(ValidationError::PasswordConfirmationMismatch.into());
        }
        validation::validate_password(password)?;

        let request = ResetPasswordRequest {
            token: token.to_string(),
            new_password: password.to_string(),
        };
        let result: Result<Option<Value>, ApiError> =
            self.api.post_json("/reset-password", &request).await;

        let outcome = if result.is_ok() {
            AuthEventOutcome::Success
        } else {
            AuthEventOutcome::Failure
        };
        AuthAuditEvent::new(AuthEventType::PasswordReset, outcome, "/reset-password").log();

        result.map(|_| ()).map_err(ClientError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignUpForm {
        SignUpForm {
            first_name: "Budi".into(),
            last_name: "Santoso".into(),
            username: "budi99".into(),
            phone: "62 812 3456 789".into(),
            address: "Jl. Merdeka 1".into(),
            email: "budi@example.com".into(),
            password: "Rahasia123!".into(),
        }
    }

    #[test]
    fn test_sign_up_normalises_phone_and_clears_admin() {
        let request = valid_form().validate().unwrap();
        assert_eq!(request.phone, "+628123456789");
        assert!(!request.is_admin);
    }

    #[test]
    fn test_identifier_kind_hides_value() {
        assert_eq!(identifier_kind("budi@example.com"), "email");
        assert_eq!(identifier_kind("budi"), "username");
    }

    #[test]
    fn test_sign_up_rejects_bad_fields() {
        let form = SignUpForm {
            username: "bu".into(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::InvalidUsername);

        let form = SignUpForm {
            password: "password".into(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::WeakPassword);

        let form = SignUpForm {
            email: "budi".into(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::InvalidEmail);
    }
}
