use dioxus::prelude::*;
use session::Clock;
use ui::{use_session, LogoutButton};

use crate::Route;

#[component]
pub fn Dashboard() -> Element {
    let guard = use_session();
    let nav = use_navigator();

    let expiry = match guard.session().expires_at() {
        Some(expires_at) => {
            describe_remaining(expires_at.saturating_sub(guard.session().clock().now_millis()))
        }
        None => "Session does not expire".to_string(),
    };

    rsx! {
        div {
            class: "dashboard",
            style: "display: flex; flex-direction: column; gap: 1rem; padding: 2rem; max-width: 720px; margin: 0 auto;",

            div {
                style: "display: flex; align-items: center; justify-content: space-between;",
                h1 {
                    style: "margin: 0; color: #37352f; font-size: 1.5rem;",
                    "Dashboard"
                }
                LogoutButton {
                    class: "logout-btn",
                    on_logout: move |_| {
                        nav.replace(Route::Login {});
                    },
                }
            }

            p {
                style: "margin: 0; color: #787774; font-size: 0.875rem;",
                "{expiry}"
            }
        }
    }
}

fn describe_remaining(millis: i64) -> String {
    let minutes = millis.max(0) / 60_000;
    format!("Session expires in {}h {:02}m", minutes / 60, minutes % 60)
}
