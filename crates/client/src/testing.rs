//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use newtab_core::IdentityUser;
use reqwest::StatusCode;
use secrecy::SecretString;

use crate::api::{ApiError, ApiRequest, ApiResponse, Transport};
use crate::identity::IdentityProvider;
use crate::services::auth::AuthError;

/// A [`Transport`] that replays queued responses in order and records every request.
///
/// Requests beyond the queued responses get a 599 response so tests fail loudly.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, status: StatusCode, body: &str) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(ApiResponse::new(status, body));
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.path).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or_else(|| {
            ApiResponse::new(StatusCode::from_u16(599).unwrap_or(StatusCode::IM_A_TEAPOT), "")
        }))
    }
}

/// An [`IdentityProvider`] that always reports the same identity.
pub struct StaticIdentity(pub Option<IdentityUser>);

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn load(&self, _token: &SecretString) -> Result<Option<IdentityUser>, AuthError> {
        Ok(self.0.clone())
    }
}
