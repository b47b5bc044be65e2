//! newtab backend API client.
//!
//! [`ApiClient`] is a thin wrapper over a [`Transport`]: it builds requests
//! from the path builders in [`newtab_core::api`], injects the session's
//! bearer token and decodes JSON bodies. Endpoints whose status codes carry
//! meaning for the caller (`GET /user/{id}`, `POST /create_user`) return the
//! raw [`ApiResponse`]; the others return decoded records.

mod error;
mod transport;

use std::sync::Arc;

use newtab_core::api;
use newtab_core::{
    AuthResponse, Confirmation, ConfirmRequest, CreateUserRequest, CurrentUserResponse, Email,
    Link, Plan, PlanId, Settings, UserId,
};
use reqwest::Method;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Client for the newtab backend.
///
/// Cheap to clone; clones share the underlying transport but carry their own
/// token.
pub struct ApiClient<T: Transport = ReqwestTransport> {
    transport: Arc<T>,
    token: Option<SecretString>,
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            token: self.token.clone(),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client without a session token.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            token: None,
        }
    }

    /// A clone of this client that authenticates with `token`.
    #[must_use]
    pub fn with_token(&self, token: SecretString) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            token: Some(token),
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request with the session token attached. The status is not checked.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        request.bearer.clone_from(&self.token);
        self.transport.send(request).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::GET, path, None)
            .await?
            .error_for_status()?
            .json()
    }

    async fn post_json<R: DeserializeOwned>(&self, path: &str, body: Value) -> Result<R, ApiError> {
        self.request(Method::POST, path, Some(body))
            .await?
            .error_for_status()?
            .json()
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// `GET /user/{id}`; 200 carries a [`newtab_core::UserRecord`], 404 means unknown.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &UserId) -> Result<ApiResponse, ApiError> {
        self.request(Method::GET, &api::user(user_id), None).await
    }

    /// `POST /create_user`; any 2xx carries the created [`newtab_core::UserRecord`].
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails or the body cannot be encoded.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<ApiResponse, ApiError> {
        let body = serde_json::to_value(request)?;
        self.request(Method::POST, api::CREATE_USER, Some(body)).await
    }

    /// `GET /user/me`, the user bound to the session token.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<ApiResponse, ApiError> {
        self.request(Method::GET, api::CURRENT_USER, None).await
    }

    /// `GET /user/{id}/links`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body is malformed.
    #[instrument(skip(self))]
    pub async fn user_links(&self, user_id: &UserId) -> Result<Vec<Link>, ApiError> {
        self.get_json(&api::user_links(user_id)).await
    }

    /// `GET /user/{id}/settings`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body is malformed.
    #[instrument(skip(self))]
    pub async fn user_settings(&self, user_id: &UserId) -> Result<Settings, ApiError> {
        self.get_json(&api::user_settings(user_id)).await
    }

    /// Decode a [`CurrentUserResponse`] from a `GET /user/me` response.
    ///
    /// # Errors
    ///
    /// Returns error if the body is malformed.
    pub fn decode_current_user(response: &ApiResponse) -> Result<CurrentUserResponse, ApiError> {
        response.json()
    }

    // =========================================================================
    // Plans
    // =========================================================================

    /// `GET /plan/{planId}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body is malformed.
    #[instrument(skip(self))]
    pub async fn get_plan(&self, plan_id: &PlanId) -> Result<Plan, ApiError> {
        self.get_json(&api::plan(plan_id)).await
    }

    /// `POST /confirm`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body is malformed.
    #[instrument(skip(self))]
    pub async fn confirm_subscription(&self, email: &Email) -> Result<Confirmation, ApiError> {
        let body = serde_json::to_value(ConfirmRequest {
            email: email.clone(),
        })?;
        self.post_json(api::CONFIRM_SUBSCRIPTION, body).await
    }

    // =========================================================================
    // Landing page auth
    // =========================================================================

    /// `POST /api/auth/login` or `/api/auth/register` with email and password.
    ///
    /// Returns the raw response so callers can map rejection statuses.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails.
    #[instrument(skip(self, password))]
    pub async fn password_auth(
        &self,
        path: &str,
        email: &Email,
        password: &str,
    ) -> Result<ApiResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.request(Method::POST, path, Some(body)).await
    }

    /// Decode an [`AuthResponse`] from a successful login or register response.
    ///
    /// # Errors
    ///
    /// Returns error if the body is malformed.
    pub fn decode_auth(response: &ApiResponse) -> Result<AuthResponse, ApiError> {
        response.json()
    }
}
