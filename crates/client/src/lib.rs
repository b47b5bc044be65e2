//! newtab Client - session bootstrap, stores and route guard.
//!
//! This crate holds the client-side logic of the newtab product, independent
//! of any UI layer:
//!
//! - Session, user profile and settings stores ([`stores`])
//! - The route guard that gates pages behind authentication ([`guard`])
//! - The staging deployment gate ([`staging`])
//! - A thin backend API client with bearer-token injection ([`api`])
//! - The identity provider seam ([`identity`])
//! - Landing page auth, plan lookups and search suggestions ([`services`])
//!
//! # Control flow
//!
//! ```text
//! navigation -> staging gate -> route guard -> session check
//!            -> user profile (fetch-or-create) -> settings -> allow | redirect
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let mut state = AppState::from_config(&config)?;
//! match state.navigate(Route::Settings).await {
//!     Navigation::Allow => render(Route::Settings),
//!     Navigation::Redirect(route) => render(route),
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod guard;
pub mod identity;
pub mod services;
pub mod staging;
pub mod state;
pub mod storage;
pub mod stores;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, ReqwestTransport, Transport};
pub use config::{ClientConfig, ConfigError};
pub use guard::{GuardState, Navigation};
pub use identity::{BackendIdentity, IdentityProvider};
pub use services::auth::{AuthError, AuthService, Credentials};
pub use state::{AppState, StateError};
