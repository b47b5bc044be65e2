//! Identity provider.
//!
//! The identity provider owns the signed-in person (subject id, names, email
//! addresses), independent of the newtab backend's user record. The route
//! guard asks it who holds the current session token.

use async_trait::async_trait;
use newtab_core::IdentityUser;
use secrecy::SecretString;
use tracing::{instrument, warn};

use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::services::auth::AuthError;

/// Resolves a session token to the signed-in identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The identity bound to `token`, or `None` if the token is not (or no
    /// longer) signed in.
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be reached or answers garbage.
    async fn load(&self, token: &SecretString) -> Result<Option<IdentityUser>, AuthError>;
}

/// Identity provider backed by the session-based `GET /user/me` endpoint.
pub struct BackendIdentity<T: Transport = ReqwestTransport> {
    api: ApiClient<T>,
}

impl<T: Transport> BackendIdentity<T> {
    #[must_use]
    pub const fn new(api: ApiClient<T>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<T: Transport> IdentityProvider for BackendIdentity<T> {
    #[instrument(skip_all)]
    async fn load(&self, token: &SecretString) -> Result<Option<IdentityUser>, AuthError> {
        let response = self.api.with_token(token.clone()).current_user().await?;

        if !response.status.is_success() {
            warn!(status = %response.status, "session rejected by backend");
            return Ok(None);
        }

        let current = ApiClient::<T>::decode_current_user(&response)?;
        Ok(Some(current.user.into()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::testing::ScriptedTransport;

    #[tokio::test]
    async fn test_load_current_user() {
        let transport = ScriptedTransport::new();
        transport.push(
            StatusCode::OK,
            r#"{"user":{"id":"u_1","email":"a@b.com","first_name":"Ada"}}"#,
        );
        let provider = BackendIdentity::new(ApiClient::new(transport));

        let identity = provider
            .load(&SecretString::from("tok_1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(identity.id.as_str(), "u_1");
        assert_eq!(identity.first_name.as_deref(), Some("Ada"));
        let calls = provider.api.transport().calls();
        assert_eq!(calls[0].path, "/user/me");
        assert_eq!(
            calls[0].bearer.as_ref().map(|t| t.expose_secret().to_string()),
            Some("tok_1".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_200_means_signed_out() {
        let transport = ScriptedTransport::new();
        transport.push(StatusCode::UNAUTHORIZED, "");
        let provider = BackendIdentity::new(ApiClient::new(transport));

        let identity = provider.load(&SecretString::from("stale")).await.unwrap();

        assert!(identity.is_none());
    }
}
