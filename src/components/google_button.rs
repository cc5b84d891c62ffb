//! Google Sign-In Button
//!
//! Opens the backend's Google OAuth page in a popup, then waits for either an
//! `AUTH_SUCCESS` message from the callback page or a new token in storage.
//! Gives up after 30 seconds.

use gloo_timers::callback::{Interval, Timeout};
use leptos::ev;
use leptos::prelude::*;
use serde::Deserialize;

use crate::context::{use_app, AppContext};
use crate::models::User;
use crate::session::{Session, GOOGLE_ATTEMPT_KEY};

const POLL_MS: u32 = 1_000;
const GIVE_UP_MS: u32 = 30_000;
const REDIRECT_DELAY_MS: u32 = 300;
const POPUP_FEATURES: &str = "width=600,height=700,top=100,left=100";

/// `postMessage` payload sent by the callback page
#[derive(Debug, Deserialize)]
pub struct AuthMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthMessage {
    pub const SUCCESS: &'static str = "AUTH_SUCCESS";

    pub fn into_user(self) -> Option<User> {
        if self.kind == Self::SUCCESS {
            self.user
        } else {
            None
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AttemptCheck {
    Pending,
    /// A token other than the one present at start was stored in time
    SignedIn,
    /// Popup closed with no new token
    Abandoned,
}

pub fn check_attempt(session: &Session, token_before: Option<&str>, elapsed_ms: f64, popup_closed: bool) -> AttemptCheck {
    let token = session.token();
    if token.is_some() && token.as_deref() != token_before && elapsed_ms < GIVE_UP_MS as f64 {
        return AttemptCheck::SignedIn;
    }
    if popup_closed {
        return AttemptCheck::Abandoned;
    }
    AttemptCheck::Pending
}

/// Timers and listener of one attempt; dropping it stops everything
struct Attempt {
    _poll: Interval,
    _give_up: Timeout,
    message: Option<WindowListenerHandle>,
}

impl Drop for Attempt {
    fn drop(&mut self) {
        if let Some(listener) = self.message.take() {
            listener.remove();
        }
    }
}

fn welcome(ctx: AppContext, user: Option<User>) {
    let user = user.or_else(|| ctx.session().user());
    let name = user.map(|u| u.first_name).unwrap_or_default();
    ctx.refresh_auth();
    ctx.toaster.success(&format!("¡Bienvenido, {}!", name));
    Timeout::new(REDIRECT_DELAY_MS, move || ctx.navigate_to("dashboard", true)).forget();
}

#[component]
pub fn GoogleButton(#[prop(into)] label: String, busy: RwSignal<bool>) -> impl IntoView {
    let ctx = use_app();
    let attempt = StoredValue::new_local(None::<Attempt>);

    // Defer the drop: this may run inside one of the attempt's own callbacks
    let finish = move || {
        Timeout::new(0, move || {
            attempt.try_set_value(None);
        })
        .forget();
    };

    let start = move |_| {
        if busy.get_untracked() {
            return;
        }
        let Some(window) = web_sys::window() else { return };
        let session = ctx.session();
        let token_before = session.token();
        let started = js_sys::Date::now();
        session.set(GOOGLE_ATTEMPT_KEY, &(started as u64).to_string());

        let url = ctx.config().google_auth_url();
        let popup = match window.open_with_url_and_target_and_features(&url, "googleAuth", POPUP_FEATURES) {
            Ok(Some(popup)) => popup,
            _ => {
                log::warn!("[AUTH] Google popup was blocked");
                ctx.toaster.error("La autenticación con Google no pudo completarse");
                return;
            }
        };
        log::info!("[AUTH] Google sign-in started");
        busy.set(true);

        let message = window_event_listener(ev::message, move |ev: web_sys::MessageEvent| {
            let parsed = serde_wasm_bindgen::from_value::<AuthMessage>(ev.data()).ok();
            if let Some(user) = parsed.and_then(AuthMessage::into_user) {
                log::info!("[AUTH] Google sign-in confirmed by message");
                finish();
                welcome(ctx, Some(user));
            }
        });

        let poll = Interval::new(POLL_MS, move || {
            let closed = popup.closed().unwrap_or(false);
            let elapsed = js_sys::Date::now() - started;
            match check_attempt(&ctx.session(), token_before.as_deref(), elapsed, closed) {
                AttemptCheck::Pending => {}
                AttemptCheck::SignedIn => {
                    log::info!("[AUTH] Google sign-in detected in storage");
                    finish();
                    welcome(ctx, None);
                }
                AttemptCheck::Abandoned => {
                    log::info!("[AUTH] Google popup closed without signing in");
                    busy.try_set(false);
                    finish();
                }
            }
        });

        let give_up = Timeout::new(GIVE_UP_MS, move || {
            if !ctx.session().is_authenticated() {
                busy.try_set(false);
                ctx.toaster.warning("Autenticación cancelada");
            }
            finish();
        });

        attempt.set_value(Some(Attempt { _poll: poll, _give_up: give_up, message: Some(message) }));
    };

    view! {
        <button type="button" class="google-login" prop:disabled=move || busy.get() on:click=start>
            <span class="google-icon" aria-hidden="true">"G"</span>
            <span>{label}</span>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TOKEN_KEY;

    #[test]
    fn test_auth_message_payload() {
        let ok: AuthMessage =
            serde_json::from_str(r#"{"type":"AUTH_SUCCESS","user":{"firstName":"Ana","email":"a@b.co"}}"#).unwrap();
        assert_eq!(ok.into_user().map(|u| u.first_name).as_deref(), Some("Ana"));

        let other: AuthMessage = serde_json::from_str(r#"{"type":"PING"}"#).unwrap();
        assert!(other.into_user().is_none());
    }

    #[test]
    fn test_attempt_detects_new_token_only() {
        let session = Session::memory();
        assert_eq!(check_attempt(&session, None, 1_000.0, false), AttemptCheck::Pending);
        assert_eq!(check_attempt(&session, None, 1_000.0, true), AttemptCheck::Abandoned);

        session.set(TOKEN_KEY, "old");
        assert_eq!(check_attempt(&session, Some("old"), 1_000.0, false), AttemptCheck::Pending);

        session.set(TOKEN_KEY, "new");
        assert_eq!(check_attempt(&session, Some("old"), 1_000.0, true), AttemptCheck::SignedIn);
        assert_eq!(check_attempt(&session, None, 31_000.0, false), AttemptCheck::Pending);
    }
}
