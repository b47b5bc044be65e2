//! Client route table.
//!
//! Every page of the client application is a [`Route`]. Each route declares
//! who may visit it through its [`Access`] rule; the route guard in the client
//! crate enforces those rules.

use core::fmt;
use core::str::FromStr;

/// Who may visit a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only authenticated sessions with a resolved profile.
    RequiresAuth,
    /// Only unauthenticated visitors (login, signup).
    GuestOnly,
}

/// A page of the client application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Plans,
    Confirm,
    Settings,
    Login,
    Signup,
    StagingLogin,
}

/// Error returned when a path does not match any route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no route matches path {0:?}")]
pub struct UnknownRoute(pub String);

impl Route {
    /// All routes, in table order.
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::Plans,
        Self::Confirm,
        Self::Settings,
        Self::Login,
        Self::Signup,
        Self::StagingLogin,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Plans => "/plans",
            Self::Confirm => "/confirm",
            Self::Settings => "/settings",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::StagingLogin => "/staging-login",
        }
    }

    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Home | Self::Plans | Self::StagingLogin => Access::Public,
            Self::Confirm | Self::Settings => Access::RequiresAuth,
            Self::Login | Self::Signup => Access::GuestOnly,
        }
    }

    /// Resolve a location to a route.
    ///
    /// Query strings, fragments and a trailing slash are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRoute`] if no route has this path.
    pub fn from_path(location: &str) -> Result<Self, UnknownRoute> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == trimmed)
            .ok_or_else(|| UnknownRoute(location.to_owned()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_roundtrips_table() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()).unwrap(), route);
        }
    }

    #[test]
    fn test_from_path_ignores_query_and_trailing_slash() {
        assert_eq!(Route::from_path("/settings/").unwrap(), Route::Settings);
        assert_eq!(Route::from_path("/plans?ref=nav#top").unwrap(), Route::Plans);
        assert_eq!(Route::from_path("").unwrap(), Route::Home);
    }

    #[test]
    fn test_from_path_unknown() {
        assert_eq!(
            Route::from_path("/admin"),
            Err(UnknownRoute("/admin".to_string()))
        );
    }

    #[test]
    fn test_access_rules() {
        assert_eq!(Route::Settings.access(), Access::RequiresAuth);
        assert_eq!(Route::Confirm.access(), Access::RequiresAuth);
        assert_eq!(Route::Login.access(), Access::GuestOnly);
        assert_eq!(Route::Signup.access(), Access::GuestOnly);
        assert_eq!(Route::Home.access(), Access::Public);
        assert_eq!(Route::StagingLogin.access(), Access::Public);
    }
}
