//! Backend API paths.
//!
//! Paths are relative to the deployment's API base URL.

use crate::types::{PlanId, UserId};

/// `POST` - create a backend user record.
pub const CREATE_USER: &str = "/create_user";
/// `POST` - confirm a subscription for an email address.
pub const CONFIRM_SUBSCRIPTION: &str = "/confirm";
/// `GET` - the user bound to the current session token.
pub const CURRENT_USER: &str = "/user/me";
/// `POST` - landing page password login.
pub const AUTH_LOGIN: &str = "/api/auth/login";
/// `POST` - landing page registration.
pub const AUTH_REGISTER: &str = "/api/auth/register";

/// `GET` - a user record by identity provider id.
#[must_use]
pub fn user(user_id: &UserId) -> String {
    format!("/user/{}", urlencoding::encode(user_id.as_str()))
}

/// `GET` - a subscription plan by id.
#[must_use]
pub fn plan(plan_id: &PlanId) -> String {
    format!("/plan/{}", urlencoding::encode(plan_id.as_str()))
}

/// `GET` - a user's quick-links.
#[must_use]
pub fn user_links(user_id: &UserId) -> String {
    format!("{}/links", user(user_id))
}

/// `GET` - a user's preference bag.
#[must_use]
pub fn user_settings(user_id: &UserId) -> String {
    format!("{}/settings", user(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths() {
        let id = UserId::new("user_2abc");
        assert_eq!(user(&id), "/user/user_2abc");
        assert_eq!(user_links(&id), "/user/user_2abc/links");
        assert_eq!(user_settings(&id), "/user/user_2abc/settings");
    }

    #[test]
    fn test_plan_path() {
        assert_eq!(plan(&PlanId::new("price_pro")), "/plan/price_pro");
    }

    #[test]
    fn test_ids_are_escaped() {
        assert_eq!(user(&UserId::new("a/b")), "/user/a%2Fb");
    }
}
