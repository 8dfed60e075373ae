//! # Guard configuration: `guard.toml`
//!
//! Declares where the session lives in storage, how long it is honoured, and
//! which routes exist and which of them require a session.
//!
//! ## Structure
//!
//! ```toml
//! [session]
//! flag_key = "hajimi_authenticated"
//! issued_at_key = "hajimi_auth_time"
//! expiry_hours = 24.0
//!
//! [navigation]
//! login_path = "/login"
//! home_path = "/"
//!
//! [[routes]]
//! path = "/login"
//! name = "login"
//!
//! [[routes]]
//! path = "/"
//! name = "dashboard"
//! requires_auth = true
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`GuardConfig`] | Top-level config. TOML (de)serialisation, validation, canonical filename. |
//! | [`SessionConfig`] | Storage keys for the session flag and issue timestamp, and the expiry window. |
//! | [`NavigationConfig`] | The login route and the home route redirects land on. |
//!
//! Every section has a default, so a missing or empty file yields the
//! production configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::route::{normalize_path, RouteDescriptor};

/// Why a [`GuardConfig`] cannot drive a guard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("login path {0} is not a declared route")]
    UndeclaredLogin(String),
    #[error("home path {0} is not a declared route")]
    UndeclaredHome(String),
    #[error("login and home share the path {0}")]
    LoginIsHome(String),
    #[error("login route {0} must not require authentication")]
    ProtectedLogin(String),
    #[error("route {0} is declared more than once")]
    DuplicateRoute(String),
    #[error("expiry window must be a positive number of hours, got {0}")]
    InvalidExpiry(f64),
}

/// Top-level configuration stored in `guard.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteDescriptor>,
}

/// Where the session record lives and how long it is honoured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage key of the session flag.
    #[serde(default = "default_flag_key")]
    pub flag_key: String,
    /// Storage key of the issue timestamp (epoch milliseconds).
    #[serde(default = "default_issued_at_key")]
    pub issued_at_key: String,
    /// Hours after issue during which the session is honoured.
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: f64,
}

/// Routes the guard redirects to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

fn default_flag_key() -> String {
    "hajimi_authenticated".to_string()
}

fn default_issued_at_key() -> String {
    "hajimi_auth_time".to_string()
}

fn default_expiry_hours() -> f64 {
    24.0
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/login", "login"),
        RouteDescriptor::new("/", "dashboard").protected(),
    ]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            flag_key: default_flag_key(),
            issued_at_key: default_issued_at_key(),
            expiry_hours: default_expiry_hours(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            home_path: default_home_path(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            navigation: NavigationConfig::default(),
            routes: default_routes(),
        }
    }
}

impl GuardConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "guard.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check that the route table can drive a guard whose redirects terminate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.session.expiry_hours;
        if !hours.is_finite() || hours <= 0.0 {
            return Err(ConfigError::InvalidExpiry(hours));
        }

        let mut seen = HashSet::new();
        for route in &self.routes {
            let path = normalize_path(&route.path);
            if !seen.insert(path.clone()) {
                return Err(ConfigError::DuplicateRoute(path));
            }
        }

        let login = normalize_path(&self.navigation.login_path);
        let home = normalize_path(&self.navigation.home_path);
        if login == home {
            return Err(ConfigError::LoginIsHome(login));
        }

        let find = |path: &str| {
            self.routes
                .iter()
                .find(|route| normalize_path(&route.path) == path)
        };
        let login_route = find(login.as_str()).ok_or_else(|| ConfigError::UndeclaredLogin(login.clone()))?;
        if login_route.requires_auth {
            return Err(ConfigError::ProtectedLogin(login));
        }
        if find(home.as_str()).is_none() {
            return Err(ConfigError::UndeclaredHome(home));
        }

        Ok(())
    }
}
