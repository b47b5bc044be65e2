//! Network services used by the stores.
//!
//! # Services
//!
//! - `auth` - Landing page password login and registration
//! - `plans` - Subscription plan lookups with an in-memory cache
//! - `suggest` - Search suggestions from the Brave suggest API

pub mod auth;
pub mod plans;
pub mod suggest;
