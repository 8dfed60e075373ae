use dioxus::prelude::*;

use session::GuardConfig;
use views::{Dashboard, Login, NotFound};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Guarded)]
        #[route("/")]
        Dashboard {},
        #[route("/login")]
        Login {},
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

const GUARD_TOML: &str = include_str!("../guard.toml");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        ui::SessionProvider {
            config,
            Router::<Route> {}
        }
    }
}

fn load_config() -> GuardConfig {
    match GuardConfig::from_toml(GUARD_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to parse {}, using defaults: {}", GuardConfig::filename(), e);
            GuardConfig::default()
        }
    }
}

/// Runs the navigation guard on every route change.
#[component]
fn Guarded() -> Element {
    let route = use_route::<Route>();
    let guard = ui::use_session();
    let nav = use_navigator();

    let decision = guard.evaluate(&route.to_string());
    let Some(target) = guard.target(decision) else {
        return rsx! {
            Outlet::<Route> {}
        };
    };

    // The redirect is a new navigation and comes back through this layout.
    match target.parse::<Route>() {
        Ok(next) => {
            nav.replace(next);
        }
        Err(e) => tracing::error!("Redirect target {} is not a route: {}", target, e),
    }

    rsx! {}
}
