//! Session context and hooks for the UI.

use dioxus::prelude::*;
use session::{GuardConfig, NavigationGuard};

/// Storage backing the session on this platform.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStorage = session::LocalStorage;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStorage = session::MemoryStorage;

/// The navigation guard shared through context.
pub type AppGuard = NavigationGuard<PlatformStorage>;

/// Get the navigation guard, and through it the session state.
pub fn use_session() -> AppGuard {
    use_context::<AppGuard>()
}

/// Provider component that owns the navigation guard.
/// Wrap your router with this component.
#[component]
pub fn SessionProvider(config: GuardConfig, children: Element) -> Element {
    use_context_provider(|| build_guard(&config));

    rsx! {
        {children}
    }
}

fn build_guard(config: &GuardConfig) -> AppGuard {
    match AppGuard::new(config, PlatformStorage::new()) {
        Ok(guard) => guard,
        Err(e) => {
            tracing::error!("Invalid guard configuration, using built-in routes: {}", e);
            AppGuard::with_defaults(PlatformStorage::new())
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    on_logout: EventHandler<()>,
) -> Element {
    let guard = use_session();

    let onclick = move |_| match guard.session().clear() {
        Ok(()) => {
            tracing::info!("Session cleared");
            on_logout.call(());
        }
        Err(e) => tracing::error!("Failed to clear session: {}", e),
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
