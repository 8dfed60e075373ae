//! # Navigation guard
//!
//! Every navigation attempt is evaluated once, synchronously, to exactly one
//! [`Decision`]:
//!
//! | Destination | Session valid | Decision |
//! |-------------|---------------|----------|
//! | requires auth | yes | [`Decision::Allow`] |
//! | requires auth | no | [`Decision::RedirectToLogin`] |
//! | login route | yes | [`Decision::RedirectToHome`] |
//! | login route | no | [`Decision::Allow`] |
//! | any other declared route | any | [`Decision::Allow`] |
//! | undeclared path | not read | [`Decision::RedirectToHome`] (catch-all) |
//!
//! A redirect is itself a new navigation attempt. [`NavigationGuard::navigate`]
//! follows the chain until a destination is allowed; with a validated
//! [`GuardConfig`] that takes at most two redirects (unknown path → home →
//! login).

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, GuardConfig};
use crate::route::{normalize_path, Resolution, RouteDescriptor, RouteTable};
use crate::state::SessionState;
use crate::storage::KeyValueStore;

/// Redirects followed by [`NavigationGuard::navigate`] before it gives up.
pub const MAX_REDIRECTS: usize = 4;

/// Outcome of one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

/// Decide a declared route. Pure: no storage, no routing framework.
pub fn decide(route: &RouteDescriptor, session_valid: bool, is_login_path: bool) -> Decision {
    if route.requires_auth {
        if session_valid {
            Decision::Allow
        } else {
            Decision::RedirectToLogin
        }
    } else if is_login_path && session_valid {
        Decision::RedirectToHome
    } else {
        Decision::Allow
    }
}

/// Where a navigation attempt ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// The allowed destination, normalized.
    pub destination: String,
    /// Each redirect target, in order. Empty when the first attempt was allowed.
    pub hops: Vec<String>,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        !self.hops.is_empty()
    }
}

/// Gate between the route table and the session record.
#[derive(Clone, Debug)]
pub struct NavigationGuard<S, C = SystemClock> {
    routes: RouteTable,
    login_path: String,
    home_path: String,
    session: SessionState<S, C>,
}

impl<S: KeyValueStore> NavigationGuard<S> {
    /// Guard over `store` using the platform clock.
    pub fn new(config: &GuardConfig, store: S) -> Result<Self, ConfigError> {
        Self::with_clock(config, store, SystemClock)
    }

    /// Guard over `store` with the built-in route table and storage keys.
    pub fn with_defaults(store: S) -> Self {
        Self::from_config(&GuardConfig::default(), store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> NavigationGuard<S, C> {
    pub fn with_clock(config: &GuardConfig, store: S, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config, store, clock))
    }

    fn from_config(config: &GuardConfig, store: S, clock: C) -> Self {
        Self {
            routes: RouteTable::new(config.routes.iter().cloned()),
            login_path: normalize_path(&config.navigation.login_path),
            home_path: normalize_path(&config.navigation.home_path),
            session: SessionState::with_clock(store, clock, config.session.clone()),
        }
    }

    pub fn session(&self) -> &SessionState<S, C> {
        &self.session
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn is_login_path(&self, path: &str) -> bool {
        normalize_path(path) == self.login_path
    }

    /// Evaluate a single navigation attempt to `path`.
    pub fn evaluate(&self, path: &str) -> Decision {
        let decision = match self.routes.resolve(path) {
            Resolution::Unmatched => Decision::RedirectToHome,
            Resolution::Matched(route) => {
                let is_login = self.is_login_path(&route.path);
                // Open routes never touch storage.
                let session_valid = (route.requires_auth || is_login) && self.session.is_valid();
                decide(route, session_valid, is_login)
            }
        };
        debug!("Navigation to {} -> {:?}", path, decision);
        decision
    }

    /// The path a redirect decision points at.
    pub fn target(&self, decision: Decision) -> Option<&str> {
        match decision {
            Decision::Allow => None,
            Decision::RedirectToLogin => Some(&self.login_path),
            Decision::RedirectToHome => Some(&self.home_path),
        }
    }

    /// Evaluate `path` and every redirect it leads to.
    pub fn navigate(&self, path: &str) -> Navigation {
        let mut current = normalize_path(path);
        let mut hops = Vec::new();
        loop {
            let Some(next) = self.target(self.evaluate(&current)) else {
                return Navigation {
                    destination: current,
                    hops,
                };
            };
            if hops.len() == MAX_REDIRECTS {
                warn!(
                    "Navigation to {} exceeded {} redirects, stopping at {}",
                    path, MAX_REDIRECTS, self.login_path
                );
                return Navigation {
                    destination: self.login_path.clone(),
                    hops,
                };
            }
            current = next.to_string();
            hops.push(current.clone());
        }
    }
}
