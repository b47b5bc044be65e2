//! Core types for newtab.
//!
//! This module provides type-safe wrappers for domain concepts and the wire
//! records exchanged with the backend.

pub mod email;
pub mod id;
pub mod plan;
pub mod settings;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use plan::{Confirmation, ConfirmRequest, Plan};
pub use settings::Settings;
pub use user::{
    AuthResponse, CreateUserRequest, CurrentUser, CurrentUserResponse, IdentityUser, Link,
    UserProfile, UserRecord,
};
