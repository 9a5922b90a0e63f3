//! Dine Admin - staff session and menu management.
//!
//! This crate is the staff-facing side of Dine: it signs staff in against
//! the auth service, keeps the session alive across restarts, and edits a
//! restaurant's menu through the bearer-authenticated catalog and
//! organization APIs.
//!
//! # Architecture
//!
//! - [`auth::SessionManager`] - token lifecycle over injected ports
//!   ([`auth::AuthApi`], [`auth::SessionStore`], [`auth::Clock`])
//! - [`client::AdminClient`] - items, categories and restaurants
//! - [`table::ItemTable`] - filtered, paginated item list with optimistic
//!   toggles ([`optimistic::with_optimistic_update`])
//!
//! # Security
//!
//! Tokens and passwords are held as `secrecy::SecretString` and never
//! logged. Restaurant management is limited to super admins; the role is
//! read from the access token before any request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod optimistic;
pub mod table;

pub use auth::{AuthError, Bearer, SessionManager, SessionStatus, StaffSession, open_session};
pub use client::AdminClient;
pub use config::{AdminConfig, ConfigError};
pub use error::AdminError;
pub use table::{ItemTable, TablePage};
