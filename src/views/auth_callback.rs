//! OAuth Callback View
//!
//! Landing page of the Google popup. Stores the session it was handed, tells
//! the opener and closes itself.

use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::JsCast;

use super::{location_search, mount_view, ViewHandle};
use crate::components::AuthMessage;
use crate::context::{use_app, AppContext};
use crate::models::User;
use crate::router::routes::query_param;
use crate::session::{Session, TOKEN_KEY};

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <AuthCallbackPage /> }.into_any())
}

#[derive(Serialize)]
struct SuccessMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    user: &'a User,
}

/// Token and user handed over in the query string
pub fn read_callback(search: &str) -> Option<(String, Option<User>)> {
    let token = query_param(search, "token")?;
    let user = query_param(search, "user").and_then(|raw| serde_json::from_str(&raw).ok());
    Some((token, user))
}

pub fn store_callback(session: &Session, token: &str, user: Option<&User>) {
    match user {
        Some(user) => session.store_login(token, user),
        None => session.set(TOKEN_KEY, token),
    }
}

/// Post `AUTH_SUCCESS` to the window that opened this popup; false without one
fn notify_opener(window: &web_sys::Window, user: &User) -> bool {
    let Some(opener) = window
        .opener()
        .ok()
        .filter(|o| !o.is_null() && !o.is_undefined())
        .and_then(|o| o.dyn_into::<web_sys::Window>().ok())
    else {
        return false;
    };
    let message = SuccessMessage { kind: AuthMessage::SUCCESS, user };
    let payload = match serde_wasm_bindgen::to_value(&message) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("[AUTH] Could not encode callback message: {}", e);
            return false;
        }
    };
    let origin = window.location().origin().unwrap_or_else(|_| "*".to_string());
    if let Err(e) = opener.post_message(&payload, &origin) {
        log::warn!("[AUTH] postMessage to opener failed: {:?}", e);
        return false;
    }
    true
}

#[component]
fn AuthCallbackPage() -> impl IntoView {
    let ctx = use_app();
    let failed = RwSignal::new(false);

    match read_callback(&location_search()) {
        Some((token, user)) => {
            let session = ctx.session();
            store_callback(&session, &token, user.as_ref());
            ctx.refresh_auth();
            log::info!("[AUTH] Google session stored");

            let user = user.or_else(|| session.user()).unwrap_or_default();
            let window = web_sys::window();
            let handed_over = window.as_ref().is_some_and(|w| notify_opener(w, &user));
            match window {
                Some(window) if handed_over => {
                    let _ = window.close();
                }
                _ => ctx.navigate_to("dashboard", true),
            }
        }
        None => {
            log::warn!("[AUTH] Callback reached without a token");
            failed.set(true);
            ctx.toaster.error("La autenticación con Google no pudo completarse");
        }
    }

    view! {
        <section class="auth-card callback-card">
            <Show
                when=move || failed.get()
                fallback=|| view! {
                    <span class="spinner" aria-hidden="true"></span>
                    <p>"Completando inicio de sesión..."</p>
                }
            >
                <p>"No pudimos completar el inicio de sesión con Google."</p>
                <button type="button" class="btn-primary" on:click=move |_| ctx.navigate("login")>
                    "Volver a iniciar sesión"
                </button>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_callback_parses_user_json() {
        let search = "?token=abc.def.ghi&user=%7B%22firstName%22%3A%22Ana%22%2C%22email%22%3A%22a%40b.co%22%7D";
        let (token, user) = read_callback(search).unwrap();
        assert_eq!(token, "abc.def.ghi");
        assert_eq!(user.map(|u| u.first_name).as_deref(), Some("Ana"));

        let (_, user) = read_callback("?token=t&user=not-json").unwrap();
        assert!(user.is_none());
        assert!(read_callback("?user=%7B%7D").is_none());
    }

    #[test]
    fn test_store_callback_without_user_keeps_token() {
        let session = Session::memory();
        store_callback(&session, "t", None);
        assert_eq!(session.token().as_deref(), Some("t"));
        assert!(session.user().is_none());

        let user = User { first_name: "Ana".into(), ..Default::default() };
        store_callback(&session, "t2", Some(&user));
        assert_eq!(session.user().map(|u| u.first_name).as_deref(), Some("Ana"));
    }
}
