//! Global session state.
//!
//! State changes go through [`reduce`], a pure function over a closed set of
//! actions. [`SessionStore::dispatch`] applies it and performs the one side
//! effect the session owns: persisting or removing the token.

use tracing::{debug, warn};

use super::token_store::{TokenStore, TokenStoreError};
use crate::models::User;

/// Who is signed in, if anyone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub is_login: bool,
    pub user: Option<User>,
}

impl SessionState {
    pub fn is_admin(&self) -> bool {
        self.is_login && self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().filter(|_| self.is_login).map(|u| u.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Session restored or user record refreshed. The payload carries the token.
    UserSuccess(User),
    /// Fresh sign-in. The payload carries the token.
    LoginSuccess(User),
    AuthError,
    Logout,
}

impl SessionAction {
    fn name(&self) -> &'static str {
        match self {
            SessionAction::UserSuccess(_) => "USER_SUCCESS",
            SessionAction::LoginSuccess(_) => "LOGIN_SUCCESS",
            SessionAction::AuthError => "AUTH_ERROR",
            SessionAction::Logout => "LOGOUT",
        }
    }
}

/// Pure transition function
pub fn reduce(_state: &SessionState, action: &SessionAction) -> SessionState {
    match action {
        SessionAction::UserSuccess(user) | SessionAction::LoginSuccess(user) => SessionState {
            is_login: true,
            user: Some(user.clone()),
        },
        SessionAction::AuthError | SessionAction::Logout => SessionState::default(),
    }
}

/// Holds the current state and the persisted token
pub struct SessionStore {
    state: SessionState,
    tokens: Box<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(tokens: Box<dyn TokenStore>) -> Self {
        Self {
            state: SessionState::default(),
            tokens,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stored_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.tokens.load()
    }

    /// Apply `action`. The in-memory state always moves; a token store
    /// failure is reported after the transition.
    pub fn dispatch(&mut self, action: SessionAction) -> Result<(), TokenStoreError> {
        debug!(action = action.name(), "Session dispatch");
        self.state = reduce(&self.state, &action);

        let persisted = match &action {
            SessionAction::UserSuccess(user) | SessionAction::LoginSuccess(user) => {
                if user.token.is_empty() {
                    // Nothing to persist; keep whatever is stored.
                    Ok(())
                } else {
                    self.tokens.save(&user.token)
                }
            }
            SessionAction::AuthError | SessionAction::Logout => self.tokens.clear(),
        };

        if let Err(e) = &persisted {
            warn!(action = action.name(), error = %e, "Failed to update stored session token");
        }
        persisted
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
