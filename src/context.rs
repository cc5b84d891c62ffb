//! Application Context
//!
//! Shared services and signals provided via the Leptos Context API and handed
//! to every view setup. `Copy`, so closures and spawned tasks take it by value.

use std::rc::Rc;

use futures::future::select;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{self, RestClient};
use crate::config::AppConfig;
use crate::router::{BrowserShell, NavOutcome, Router};
use crate::session::Session;
use crate::toast::Toaster;

/// Delay before checking that a navigation actually rendered
const WATCHDOG_MS: u32 = 300;
const LOGOUT_GRACE_MS: u32 = 2_000;

pub const LOGOUT_MESSAGE: &str = "Sesión cerrada correctamente";
pub const SESSION_EXPIRED: &str = "Tu sesión ha expirado. Por favor, inicia sesión de nuevo.";

type AppRouter = Rc<Router<BrowserShell>>;

#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<AppConfig>,
    session: StoredValue<Session, LocalStorage>,
    router: StoredValue<Option<AppRouter>, LocalStorage>,
    pub toaster: Toaster,
    /// View shown after the last successful navigation
    pub current_route: RwSignal<Option<&'static str>>,
    pub footer_visible: RwSignal<bool>,
    pub authenticated: RwSignal<bool>,
}

impl AppContext {
    pub fn new(config: AppConfig, session: Session) -> Self {
        let toaster = Toaster::new(config.toast_duration_ms);
        let authenticated = session.is_authenticated();
        Self {
            config: StoredValue::new(config),
            session: StoredValue::new_local(session),
            router: StoredValue::new_local(None),
            toaster,
            current_route: RwSignal::new(None),
            footer_visible: RwSignal::new(false),
            authenticated: RwSignal::new(authenticated),
        }
    }

    /// Build the router over the real DOM. Called once at start-up.
    pub fn install_router(&self) {
        let router = Router::new(BrowserShell::new(*self), self.session());
        self.router.set_value(Some(Rc::new(router)));
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn session(&self) -> Session {
        self.session.get_value()
    }

    pub fn api(&self) -> RestClient {
        RestClient::new(self.config.with_value(|c| c.api_base_url.clone()), self.session())
    }

    fn active_router(&self) -> Option<AppRouter> {
        let router = self.router.get_value();
        if router.is_none() {
            log::error!("[ROUTER] Navigation requested before the router was installed");
        }
        router
    }

    /// Navigate by route key
    pub fn navigate(&self, route: &str) {
        let Some(router) = self.active_router() else { return };
        let route = route.to_string();
        spawn_local(async move {
            let outcome = router.navigate(&route).await;
            watch(router, outcome).await;
        });
    }

    pub fn navigate_to(&self, view: &str, force: bool) {
        let Some(router) = self.active_router() else { return };
        let view = view.to_string();
        spawn_local(async move {
            let outcome = router.navigate_to(&view, force).await;
            watch(router, outcome).await;
        });
    }

    /// Route from the current URL (start-up and `popstate`)
    pub fn handle_routing(&self) {
        let Some(router) = self.active_router() else { return };
        spawn_local(async move {
            let outcome = router.handle_routing().await;
            watch(router, outcome).await;
        });
    }

    /// Record the view now on screen
    pub fn set_route(&self, view: &'static str) {
        self.current_route.set(Some(view));
        self.footer_visible.set(crate::footer::should_show(view));
        self.refresh_auth();
    }

    pub fn refresh_auth(&self) {
        self.authenticated.set(self.session().is_authenticated());
    }

    /// Tell the server, then drop the session and go to login.
    /// The server call is best effort and bounded by a short grace period.
    pub fn logout(&self) {
        let ctx = *self;
        let api = self.api();
        spawn_local(async move {
            let request = Box::pin(commands::logout(&api));
            let grace = Box::pin(TimeoutFuture::new(LOGOUT_GRACE_MS));
            select(request, grace).await;

            let session = ctx.session();
            session.clear();
            session.set_logout_message(LOGOUT_MESSAGE);
            ctx.refresh_auth();
            log::info!("[AUTH] Logged out");
            ctx.navigate_to("login", true);
        });
    }

    /// Missing or rejected token: clear it and send the user to login
    pub fn on_auth_failure(&self) {
        log::warn!("[AUTH] Session rejected, redirecting to login");
        self.session().clear();
        self.refresh_auth();
        self.toaster.error(SESSION_EXPIRED);
        self.navigate_to("login", true);
    }
}

async fn watch(router: AppRouter, outcome: NavOutcome) {
    log::debug!("[ROUTER] {:?}", outcome);
    if matches!(outcome, NavOutcome::Rendered(_) | NavOutcome::Failed(_)) {
        TimeoutFuture::new(WATCHDOG_MS).await;
        if let Some(retry) = router.verify_loaded().await {
            log::debug!("[ROUTER] Retry: {:?}", retry);
        }
    }
}

/// Context lookup for components
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
