//! newtab Core - Shared types library.
//!
//! This crate provides the types used across all newtab components:
//! - `client` - Session, user and settings stores, route guard, API client
//! - `cli` - Command-line driver for the client library
//!
//! # Architecture
//!
//! The core crate contains only types and static tables - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, user/plan/settings records
//! - [`api`] - Backend API path builders
//! - [`routes`] - Client route table and access rules
//! - [`search`] - Built-in search engine table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod routes;
pub mod search;
pub mod types;

pub use routes::{Access, Route, UnknownRoute};
pub use search::SearchEngine;
pub use types::*;
