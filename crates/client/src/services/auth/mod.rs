//! Landing page authentication.
//!
//! Password login and registration against the backend's `/api/auth/*`
//! endpoints, and the client application URL visitors are sent to once they
//! hold a token.

mod error;

use newtab_core::{AuthResponse, Email, api};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::{ApiClient, ApiError, ReqwestTransport, Transport};

pub use error::AuthError;

/// Email and password entered on the login or signup form.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

impl Credentials {
    /// Build credentials from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`] if the email is malformed.
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self {
            email: Email::parse(email.trim())?,
            password: SecretString::from(password.into()),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Password authentication against the landing page auth API.
pub struct AuthService<T: Transport = ReqwestTransport> {
    api: ApiClient<T>,
    app_url: Url,
}

impl<T: Transport> AuthService<T> {
    #[must_use]
    pub const fn new(api: ApiClient<T>, app_url: Url) -> Self {
        Self { api, app_url }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on 400/401/403/404, or an API
    /// error for any other failure.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        let response = self
            .api
            .password_auth(
                api::AUTH_LOGIN,
                &credentials.email,
                credentials.password.expose_secret(),
            )
            .await?;

        match response.status {
            status if status.is_success() => {
                let auth = ApiClient::<T>::decode_auth(&response)?;
                info!(user_id = %auth.user.id, "login succeeded");
                Ok(auth)
            }
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND => {
                warn!(status = %response.status, "login rejected");
                Err(AuthError::InvalidCredentials)
            }
            _ => Err(AuthError::Api(ApiError::Status {
                status: response.status,
                message: response.body,
            })),
        }
    }

    /// Register a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserAlreadyExists`] on 409, or an API error for any
    /// other failure.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        let response = self
            .api
            .password_auth(
                api::AUTH_REGISTER,
                &credentials.email,
                credentials.password.expose_secret(),
            )
            .await?;

        match response.status {
            status if status.is_success() => {
                let auth = ApiClient::<T>::decode_auth(&response)?;
                info!(user_id = %auth.user.id, "registration succeeded");
                Ok(auth)
            }
            StatusCode::CONFLICT => Err(AuthError::UserAlreadyExists),
            _ => Err(AuthError::Api(ApiError::Status {
                status: response.status,
                message: response.body,
            })),
        }
    }

    /// The client application URL, where a freshly authenticated visitor is sent.
    #[must_use]
    pub const fn app_url(&self) -> &Url {
        &self.app_url
    }
}
