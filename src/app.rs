//! TidyTasks App
//!
//! Application shell: builds the shared context, installs the router and
//! renders the chrome that lives outside the routed views (toasts, footer).

use leptos::ev;
use leptos::prelude::*;

use crate::components::{SiteFooter, ToastHost};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::footer;
use crate::session::{Session, DASHBOARD_REDIRECT_KEY};

fn prepare_window() {
    let Some(window) = web_sys::window() else { return };
    if let Ok(history) = window.history() {
        let _ = history.set_scroll_restoration(web_sys::ScrollRestoration::Manual);
    }
    footer::scroll_to_top();
}

#[component]
pub fn App() -> impl IntoView {
    let session = Session::browser();
    // Leftover from an interrupted OAuth redirect
    session.remove(DASHBOARD_REDIRECT_KEY);
    footer::apply_theme(footer::stored_theme(&session));

    let config = AppConfig::from_window();
    log::info!("[APP] Starting against {}", config.api_base_url);
    let ctx = AppContext::new(config, session);
    provide_context(ctx);
    ctx.install_router();
    prepare_window();

    let popstate = window_event_listener(ev::popstate, move |_| ctx.handle_routing());
    on_cleanup(move || popstate.remove());

    ctx.handle_routing();

    view! {
        <ToastHost />
        <SiteFooter />
    }
}
