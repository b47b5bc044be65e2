//! User profile store.
//!
//! Resolves the backend user record for a signed-in identity (fetching it,
//! or creating it on first sight) and keeps the resolved profile and plan.

use newtab_core::{CreateUserRequest, Email, IdentityUser, Plan, UserId, UserProfile, UserRecord};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError, Transport};
use crate::services::plans::PlanCache;

/// Errors that can occur while resolving the user profile.
#[derive(Debug, Error)]
pub enum UserError {
    /// The user was unknown and the create-user call did not succeed.
    #[error("user does not exist, failed to create (status {status})")]
    Creation { status: StatusCode },

    /// The get-user call answered with neither 200 nor 404.
    #[error("failed to fetch user data (status {status})")]
    Fetch { status: StatusCode },

    /// The identity has no email address to create the user with.
    #[error("no user email found")]
    MissingEmail,

    /// An operation needed a resolved profile.
    #[error("user profile is not loaded")]
    NotLoaded,

    /// Transport or decode failure.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
}

/// Owns the [`UserProfile`]. All mutation goes through the setters.
#[derive(Debug, Default)]
pub struct UserStore {
    profile: UserProfile,
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the backend user record for `identity` and populate the profile.
    ///
    /// `GET /user/{id}`; on 404, `POST /create_user` with the identity's id and
    /// primary email. Email and user id come from the backend record, first
    /// and last name from the identity provider. Nothing is written to the
    /// store unless the whole round trip succeeds.
    ///
    /// # Errors
    ///
    /// - [`UserError::Fetch`] if the get call answers anything but 200 or 404
    /// - [`UserError::Creation`] if the create call answers non-2xx
    /// - [`UserError::MissingEmail`] if creation is needed but the identity has no email
    /// - [`UserError::Api`] on transport or decode failures
    #[instrument(skip_all, fields(user_id = %identity.id))]
    pub async fn fetch_user_data<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        identity: &IdentityUser,
    ) -> Result<(), UserError> {
        let response = api.get_user(&identity.id).await?;

        let record: UserRecord = match response.status {
            StatusCode::OK => response.json()?,
            StatusCode::NOT_FOUND => {
                let email = identity.primary_email().ok_or(UserError::MissingEmail)?;
                let request = CreateUserRequest {
                    user_id: identity.id.clone(),
                    email: email.clone(),
                };
                let created = api.create_user(&request).await?;
                if !created.status.is_success() {
                    return Err(UserError::Creation {
                        status: created.status,
                    });
                }
                info!("created backend user");
                created.json()?
            }
            status => return Err(UserError::Fetch { status }),
        };

        self.set_email(record.email);
        self.set_user_id(record.id);
        self.set_first_name(identity.first_name.clone());
        self.set_last_name(identity.last_name.clone());
        Ok(())
    }

    /// Confirm the subscription for the profile's email and load its plan.
    ///
    /// # Errors
    ///
    /// Returns error if the profile has no email yet or either request fails.
    #[instrument(skip_all)]
    pub async fn confirm_subscription<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        plans: &PlanCache,
    ) -> Result<&Plan, UserError> {
        let email = self.profile.email.clone().ok_or(UserError::NotLoaded)?;
        let confirmation = api.confirm_subscription(&email).await?;
        let plan = plans.get(api, &confirmation.plan_id).await?;
        info!(plan_id = %plan.plan_id, "subscription confirmed");
        self.set_plan(plan);
        self.profile.plan.as_ref().ok_or(UserError::NotLoaded)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// True once a fetch-or-create round trip has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.profile.user_id.is_some()
    }

    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        self.profile.user_id.as_ref()
    }

    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        self.profile.email.as_ref()
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.profile.first_name.as_deref()
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.profile.last_name.as_deref()
    }

    #[must_use]
    pub const fn plan(&self) -> Option<&Plan> {
        self.profile.plan.as_ref()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_user_id(&mut self, user_id: UserId) {
        self.profile.user_id = Some(user_id);
    }

    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.profile.first_name = first_name;
    }

    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.profile.last_name = last_name;
    }

    pub fn set_email(&mut self, email: Email) {
        self.profile.email = Some(email);
    }

    pub fn set_plan(&mut self, plan: Plan) {
        self.profile.plan = Some(plan);
    }

    /// Empty the profile (logout).
    pub fn reset(&mut self) {
        self.profile = UserProfile::default();
    }
}
