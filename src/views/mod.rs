//! Views
//!
//! One module per route. Each exposes a `setup` that mounts its Leptos tree
//! into the fragment's view root and returns the handle that keeps it alive.

mod auth_callback;
mod calendar;
mod dashboard;
mod home;
mod login;
mod profile;
mod profile_edit;
mod recovery;
mod reset;
mod signup;

use std::any::Any;

use leptos::prelude::*;

use crate::context::{AppContext, SESSION_EXPIRED};
use crate::session::{Session, TokenState};

/// Keeps a mounted view alive; dropping it unmounts the view and disposes
/// everything it owns (timers, listeners, pending signal updates)
pub struct ViewHandle(#[allow(dead_code)] Box<dyn Any>);

impl ViewHandle {
    pub fn new<T: 'static>(handle: T) -> Self {
        Self(Box::new(handle))
    }
}

/// Shortest time a submit button stays busy
pub(crate) const MIN_SUBMIT_MS: u32 = 1_000;
/// Pause between a success toast and the redirect
pub(crate) const REDIRECT_DELAY_MS: u32 = 300;

pub type SetupFn = fn(AppContext, web_sys::HtmlElement) -> ViewHandle;

pub fn setup_for(view: &str) -> Option<SetupFn> {
    let setup: SetupFn = match view {
        "home" => home::setup,
        "login" => login::setup,
        "signup" => signup::setup,
        "recovery" => recovery::setup,
        "reset" => reset::setup,
        "dashboard" => dashboard::setup,
        "profile" => profile::setup,
        "profile-edit" => profile_edit::setup,
        "calendar" => calendar::setup,
        "auth-callback" => auth_callback::setup,
        _ => return None,
    };
    Some(setup)
}

/// Mount a view tree under `root` with the app context provided
pub(crate) fn mount_view<F>(ctx: AppContext, root: web_sys::HtmlElement, view: F) -> ViewHandle
where
    F: FnOnce() -> AnyView + 'static,
{
    let handle = mount_to(root, move || {
        provide_context(ctx);
        view()
    });
    ViewHandle::new(handle)
}

/// Stored session as seen by the login and signup forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingSession {
    Absent,
    /// Token still valid; the form should not be shown
    Live,
    /// Expired or unreadable token, already cleared
    Dropped,
}

pub fn settle_existing_session(session: &Session, now_secs: i64) -> ExistingSession {
    match session.token_state(now_secs) {
        None => ExistingSession::Absent,
        Some(TokenState::Valid) => ExistingSession::Live,
        Some(state) => {
            log::warn!("[AUTH] Stored token rejected: {:?}", state);
            session.clear();
            ExistingSession::Dropped
        }
    }
}

/// Send a live session to the dashboard; drop an expired one with a warning
pub(crate) fn check_existing_session(ctx: AppContext) {
    let now_secs = (js_sys::Date::now() / 1000.0) as i64;
    match settle_existing_session(&ctx.session(), now_secs) {
        ExistingSession::Absent => {}
        ExistingSession::Live => {
            log::info!("[AUTH] Session still valid, going to dashboard");
            ctx.navigate_to("dashboard", false);
        }
        ExistingSession::Dropped => {
            ctx.refresh_auth();
            ctx.toaster.warning(SESSION_EXPIRED);
        }
    }
}

/// Current `location.search`, including the leading `?`
pub(crate) fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Value of the input or select that fired `ev`
pub(crate) fn field_value(ev: &web_sys::Event) -> String {
    use wasm_bindgen::JsCast;
    let Some(target) = ev.target() else { return String::new() };
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return area.value();
    }
    target
        .dyn_ref::<web_sys::HtmlSelectElement>()
        .map(|select| select.value())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::routes::VIEWS;
    use crate::session::TOKEN_KEY;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn jwt(claims: &str) -> String {
        format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(claims))
    }

    #[test]
    fn test_auth_forms_see_existing_session() {
        let session = Session::memory();
        assert_eq!(settle_existing_session(&session, 1000), ExistingSession::Absent);

        session.set(TOKEN_KEY, &jwt(r#"{"exp":2000}"#));
        assert_eq!(settle_existing_session(&session, 1000), ExistingSession::Live);
        assert!(session.is_authenticated());

        assert_eq!(settle_existing_session(&session, 3000), ExistingSession::Dropped);
        assert!(!session.is_authenticated());

        session.set(TOKEN_KEY, "garbage");
        assert_eq!(settle_existing_session(&session, 1000), ExistingSession::Dropped);
        assert_eq!(settle_existing_session(&session, 1000), ExistingSession::Absent);
    }

    #[test]
    fn test_every_route_has_a_setup() {
        for view in VIEWS {
            assert!(setup_for(view).is_some(), "no setup for {}", view);
        }
        assert!(setup_for("admin").is_none());
    }
}
