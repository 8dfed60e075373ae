//! Login page view.

use dioxus::prelude::*;
use ui::use_session;

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let guard = use_session();
    let nav = use_navigator();
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if password().is_empty() {
            error.set(Some("Password cannot be empty".to_string()));
            return;
        }
        // Credential checks belong to the backend; this view only records the session.
        match guard.session().establish() {
            Ok(()) => {
                password.set(String::new());
                error.set(None);
                nav.replace(Route::Dashboard {});
            }
            Err(e) => {
                tracing::error!("Failed to store session: {}", e);
                error.set(Some("Could not save your session, check browser storage settings".to_string()));
            }
        }
    };

    rsx! {
        div {
            class: "login-container",
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; padding: 2rem; background: #ffffff;",

            h1 {
                style: "margin-bottom: 0.5rem; color: #37352f; font-weight: 700; font-size: 1.75rem;",
                "Hajimi"
            }

            p {
                style: "margin-bottom: 2rem; color: #787774; font-size: 0.9375rem;",
                "Enter the access password to continue."
            }

            form {
                class: "login-form",
                style: "display: flex; flex-direction: column; gap: 0.75rem; width: 100%; max-width: 320px;",
                onsubmit: onsubmit,

                input {
                    class: "login-input",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }

                if let Some(message) = error() {
                    p {
                        class: "login-error",
                        "{message}"
                    }
                }

                button {
                    class: "login-btn",
                    r#type: "submit",
                    "Sign in"
                }
            }
        }

        style {
            r#"
            .login-input {{
                padding: 0.625rem 0.75rem;
                border: 1px solid #e3e2e0;
                border-radius: 4px;
                font-size: 0.9375rem;
            }}

            .login-error {{
                margin: 0;
                color: #eb5757;
                font-size: 0.875rem;
            }}

            .login-btn {{
                display: flex;
                align-items: center;
                justify-content: center;
                padding: 0.625rem 1.25rem;
                border: none;
                border-radius: 4px;
                font-size: 0.9375rem;
                font-weight: 500;
                cursor: pointer;
                background-color: #24292e;
                color: white;
                font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            }}

            .login-btn:hover {{
                opacity: 0.9;
            }}
            "#
        }
    }
}
