//! Client-side state containers.
//!
//! Each store owns one slice of application state and is the only place that
//! mutates it. Stores are plain structs passed by reference; the
//! [`AppState`](crate::AppState) bundles them for the route guard.

mod session;
mod settings;
mod user;

pub use session::{Session, SessionStore};
pub use settings::{SettingsError, SettingsStore};
pub use user::{UserError, UserStore};
