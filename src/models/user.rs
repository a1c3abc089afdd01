//! User and authentication data models.

use serde::{Deserialize, Serialize};

/// A platform user as returned by the backend.
///
/// The backend answers with two shapes: `check-auth` and `signin` return a
/// flattened record with a combined `name`, while `GET /users/{id}` returns
/// the full record with `first_name`/`last_name`. Both decode into this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub photo: String,
    /// Canonical admin flag. `is_admin` is accepted on input because older
    /// payloads used snake case.
    #[serde(default, rename = "isAdmin", alias = "is_admin")]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl User {
    /// Name to show in greetings: the combined name, then first/last, then username.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.trim().to_string();
        }
        let joined = format!("{} {}", self.first_name, self.last_name);
        if !joined.trim().is_empty() {
            return joined.trim().to_string();
        }
        self.username.clone()
    }
}

/// Body of `POST /signin`. `value` is either an e-mail or a username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub value: String,
    pub password: String,
}

/// Data returned by a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInData {
    pub token: String,
    pub user: User,
}

/// Body of `POST /signup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Body of `PUT /users/change-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Body of `PUT /users/{id}`.
///
/// The backend binds this onto its stored user record, which keeps the name
/// as `first_name`/`last_name`; a combined `name` would be ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub gender: String,
}

impl ProfileUpdate {
    /// Prefill the edit form from the signed-in user. Session records only
    /// carry the combined name, which is split at the first space.
    pub fn from_user(user: &User) -> Self {
        let (first_name, last_name) = if user.first_name.trim().is_empty() {
            split_name(&user.display_name())
        } else {
            (user.first_name.trim().to_string(), user.last_name.trim().to_string())
        };
        Self {
            first_name,
            last_name,
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            gender: user.gender.clone(),
        }
    }

    /// Replace both name parts from a combined name
    pub fn set_name(&mut self, name: &str) {
        (self.first_name, self.last_name) = split_name(name);
    }
}

fn split_name(name: &str) -> (String, String) {
    match name.trim().split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_check_auth_shape() {
        let json = r#"{"id":7,"name":"Siti Aminah","email":"siti@example.com","username":"siti",
            "gender":"","phone":"+628123","address":"Bandung","photo":"","token":"","isAdmin":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.is_admin);
        assert_eq!(user.display_name(), "Siti Aminah");
    }

    #[test]
    fn test_accepts_snake_case_admin_flag() {
        let user: User = serde_json::from_str(r#"{"id":1,"is_admin":true}"#).unwrap();
        assert!(user.is_admin);
    }

    #[test]
    fn test_display_name_falls_back() {
        let user = User {
            first_name: "Budi".into(),
            last_name: "Santoso".into(),
            username: "budi".into(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "Budi Santoso");

        let bare = User {
            username: "budi".into(),
            ..Default::default()
        };
        assert_eq!(bare.display_name(), "budi");
    }

    #[test]
    fn test_profile_update_splits_session_name() {
        let user = User {
            id: 7,
            name: "Siti Nur Aminah".into(),
            email: "siti@example.com".into(),
            ..Default::default()
        };
        let update = ProfileUpdate::from_user(&user);
        assert_eq!(update.first_name, "Siti");
        assert_eq!(update.last_name, "Nur Aminah");

        let body = serde_json::to_value(&update).unwrap();
        assert!(body.get("name").is_none());
        assert_eq!(body["first_name"], "Siti");
    }

    #[test]
    fn test_profile_update_prefers_stored_name_parts() {
        let user = User {
            name: "ignored".into(),
            first_name: "Budi".into(),
            last_name: "Santoso".into(),
            ..Default::default()
        };
        let mut update = ProfileUpdate::from_user(&user);
        assert_eq!((update.first_name.as_str(), update.last_name.as_str()), ("Budi", "Santoso"));

        update.set_name("Ahmad");
        assert_eq!(update.first_name, "Ahmad");
        assert_eq!(update.last_name, "");
    }

    #[test]
    fn test_sign_up_serializes_camel_case_admin_flag() {
        let body = serde_json::to_value(SignUpRequest::default()).unwrap();
        assert_eq!(body["isAdmin"], serde_json::json!(false));
        assert!(body.get("is_admin").is_none());
    }
}
