//! This crate contains all shared UI for the workspace.

mod auth;
pub use auth::{use_session, AppGuard, LogoutButton, PlatformStorage, SessionProvider};
