//! User domain types.
//!
//! Two sources describe a user: the identity provider (names, verified email
//! addresses) and the newtab backend (the persisted user record). The
//! [`UserProfile`] combines both.

use serde::{Deserialize, Serialize};

use crate::types::{Email, Plan, UserId};

/// Backend user record, as returned by `GET /user/{id}` and `POST /create_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// External identity provider subject id.
    pub id: UserId,
    /// Email address stored by the backend.
    pub email: Email,
}

/// Body of `POST /create_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: UserId,
    pub email: Email,
}

/// The signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUser {
    /// Stable, unique subject id.
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Email addresses in provider order; the first one is primary.
    #[serde(default)]
    pub email_addresses: Vec<Email>,
}

impl IdentityUser {
    /// The primary (first) email address, if the identity has any.
    #[must_use]
    pub fn primary_email(&self) -> Option<&Email> {
        self.email_addresses.first()
    }
}

/// User payload of the session-based `GET /user/me` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Envelope of `GET /user/me`: `{"user": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: CurrentUser,
}

impl From<CurrentUser> for IdentityUser {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email_addresses: vec![user.email],
        }
    }
}

/// Response of the landing-page auth endpoints (`/api/auth/login`, `/api/auth/register`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRecord,
}

/// A quick-link shown on the new tab page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// Profile state held by the user store.
///
/// Every field starts empty; `user_id` is only populated by a completed
/// fetch-or-create round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Option<UserId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub plan: Option<Plan>,
}

impl UserProfile {
    /// Display name built from the identity provider's first and last name.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_owned()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_response_parses_minimal_body() {
        let body = r#"{"user":{"id":"u_1","email":"a@b.com"}}"#;
        let parsed: CurrentUserResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.user.id.as_str(), "u_1");
        assert!(parsed.user.first_name.is_none());
    }

    #[test]
    fn test_identity_from_current_user_uses_email_as_primary() {
        let identity = IdentityUser::from(CurrentUser {
            id: UserId::new("u_1"),
            email: Email::parse("a@b.com").unwrap(),
            first_name: Some("Ada".to_string()),
            last_name: None,
        });
        assert_eq!(identity.primary_email().unwrap().as_str(), "a@b.com");
    }

    #[test]
    fn test_create_user_request_wire_shape() {
        let request = CreateUserRequest {
            user_id: UserId::new("u_1"),
            email: Email::parse("a@b.com").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"user_id": "u_1", "email": "a@b.com"})
        );
    }

    #[test]
    fn test_display_name() {
        let mut profile = UserProfile::default();
        assert_eq!(profile.display_name(), None);
        profile.first_name = Some("Ada".to_string());
        assert_eq!(profile.display_name().as_deref(), Some("Ada"));
        profile.last_name = Some("Lovelace".to_string());
        assert_eq!(profile.display_name().as_deref(), Some("Ada Lovelace"));
    }
}
