//! Profile editing and credential management for the signed-in user.

use tracing::info;

use super::api_client::{ApiClient, FilePart, MultipartBody, RequestBody};
use super::session::{SessionAction, SessionStore};
use super::validation::{self, MIN_PASSWORD_LENGTH, ValidationError};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AuthAuditEvent, AuthEventOutcome, AuthEventType, ChangePasswordRequest, ProfileUpdate, User,
};

/// Change-password form: the mismatch check runs before the length check.
#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<ChangePasswordRequest, ValidationError> {
        if self.new_password != self.confirm_new_password {
            return Err(ValidationError::NewPasswordMismatch);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(ChangePasswordRequest {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Full user record of the signed-in user
    pub async fn fetch_profile(&self, session: &SessionStore) -> ClientResult<User> {
        let user_id = session.state().user_id().ok_or(ClientError::NotSignedIn)?;
        Ok(self.api.get(&format!("/users/{user_id}")).await?)
    }

    /// Save profile changes and refresh the session user from the response
    pub async fn update_profile(
        &self,
        session: &mut SessionStore,
        update: &ProfileUpdate,
    ) -> ClientResult<User> {
        let current = signed_in_user(session)?;
        validation::require(&update.first_name, "nama depan")?;
        validation::validate_email(&update.email)?;

        let mut user: User = self
            .api
            .put_json(&format!("/users/{}", current.id), update)
            .await?;
        refresh_session(session, &current, &mut user)?;
        info!(user_id = user.id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(&self, form: &ChangePasswordForm) -> ClientResult<()> {
        let request = form.validate()?;
        let result: Result<Option<serde_json::Value>, _> =
            self.api.put_json("/users/change-password", &request).await;

        let outcome = if result.is_ok() {
            AuthEventOutcome::Success
        } else {
            AuthEventOutcome::Failure
        };
        AuthAuditEvent::new(
            AuthEventType::PasswordChanged,
            outcome,
            "/users/change-password",
        )
        .log();

        result?;
        Ok(())
    }

    /// Replace the profile photo. Without a file this does nothing.
    pub async fn change_image(
        &self,
        session: &mut SessionStore,
        photo: Option<FilePart>,
    ) -> ClientResult<Option<User>> {
        let Some(photo) = photo else {
            return Ok(None);
        };
        let current = signed_in_user(session)?;

        let body = MultipartBody::default().with_file(FilePart {
            field: "photo".to_string(),
            ..photo
        });
        let mut user: User = self
            .api
            .send(reqwest::Method::PATCH, "/change-image", RequestBody::Multipart(body))
            .await?;
        refresh_session(session, &current, &mut user)?;
        info!(user_id = user.id, "Profile photo updated");
        Ok(Some(user))
    }
}

/// Re-populate the session from a server response. The token is kept;
/// identity fields the response left blank come from the current user.
fn refresh_session(session: &mut SessionStore, current: &User, user: &mut User) -> ClientResult<()> {
    merge_refreshed(current, user);
    session.dispatch(SessionAction::UserSuccess(user.clone()))?;
    Ok(())
}

/// `PUT /users/{id}` answers with the full record, which has no combined
/// `name`; it is rebuilt from the name parts before falling back.
fn merge_refreshed(current: &User, user: &mut User) {
    if user.id == 0 {
        user.id = current.id;
    }
    if user.name.trim().is_empty() {
        let joined = format!("{} {}", user.first_name.trim(), user.last_name.trim());
        user.name = if joined.trim().is_empty() {
            current.name.clone()
        } else {
            joined.trim().to_string()
        };
    }
    if user.username.is_empty() {
        user.username = current.username.clone();
    }
    user.token = current.token.clone();
}

fn signed_in_user(session: &SessionStore) -> ClientResult<User> {
    let state = session.state();
    state
        .user
        .clone()
        .filter(|_| state.is_login)
        .ok_or(ClientError::NotSignedIn)
}
