//! View Router
//!
//! Resolves a route to a view, fetches `views/<name>.html`, moves its
//! stylesheets into `<head>`, swaps the markup into `#app` and runs the
//! view's setup. Navigations are serialized by an async mutex whose guard
//! lives exactly as long as the navigation, and `popstate` routing is
//! skipped while one is in flight.

pub mod fragment;
pub mod routes;
mod shell;

use std::cell::{Cell, RefCell};

use futures::lock::Mutex;

use crate::error::RouterError;
use crate::session::Session;

pub use routes::Location;
pub use shell::{BrowserShell, Shell};

/// What a navigation request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Another navigation held the lock
    Skipped,
    /// Already showing the view
    Unchanged(&'static str),
    Rendered(&'static str),
    /// Error markup was shown instead
    Failed(&'static str),
}

pub struct Router<S: Shell> {
    shell: S,
    session: Session,
    current_view: RefCell<Option<&'static str>>,
    last_requested: Cell<Option<&'static str>>,
    retried: Cell<bool>,
    lock: Mutex<()>,
}

impl<S: Shell> Router<S> {
    pub fn new(shell: S, session: Session) -> Self {
        Self {
            shell,
            session,
            current_view: RefCell::new(None),
            last_requested: Cell::new(None),
            retried: Cell::new(false),
            lock: Mutex::new(()),
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn current_view(&self) -> Option<&'static str> {
        *self.current_view.borrow()
    }

    pub fn is_navigating(&self) -> bool {
        self.lock.try_lock().is_none()
    }

    /// Navigate by route key (`"profile/edit"`, `"dashboard"`, ...)
    pub async fn navigate(&self, route: &str) -> NavOutcome {
        self.navigate_to(routes::resolve(route), false).await
    }

    /// Route from the current location; no-op while a navigation runs
    pub async fn handle_routing(&self) -> NavOutcome {
        if self.is_navigating() {
            log::debug!("[ROUTER] Navigation in progress, ignoring location change");
            return NavOutcome::Skipped;
        }
        let location = self.shell.location();
        let view = routes::view_for_location(&location, self.session.is_authenticated());
        self.navigate_to(view, false).await
    }

    /// Show a view. Without `force`, re-requesting the current view does nothing.
    pub async fn navigate_to(&self, view: &str, force: bool) -> NavOutcome {
        self.retried.set(false);
        self.run(routes::resolve(view), force).await
    }

    /// Retry the last navigation once if the mount ended up empty or in error
    pub async fn verify_loaded(&self) -> Option<NavOutcome> {
        if self.retried.get() || self.is_navigating() || self.shell.mount_healthy() {
            return None;
        }
        let view = self.last_requested.get()?;
        log::warn!("[ROUTER] '{}' did not load correctly, retrying", view);
        self.retried.set(true);
        Some(self.run(view, true).await)
    }

    async fn run(&self, requested: &'static str, force: bool) -> NavOutcome {
        let _guard = self.lock.lock().await;

        let location = self.shell.location();
        let view = routes::effective_view(requested, self.session.is_authenticated(), &location.search);
        self.last_requested.set(Some(view));

        if !force && self.current_view() == Some(view) {
            log::debug!("[ROUTER] Already on '{}'", view);
            return NavOutcome::Unchanged(view);
        }

        let url = routes::url_for(view, &location.search);
        let path = url.split('?').next().unwrap_or_default();
        if location.pathname != path {
            self.shell.push_history(&url);
        }

        log::info!("[ROUTER] Loading '{}'", view);
        match self.render(view).await {
            Ok(()) => {
                *self.current_view.borrow_mut() = Some(view);
                self.shell.after_navigation(view);
                NavOutcome::Rendered(view)
            }
            Err(e) => {
                log::error!("[ROUTER] Could not load '{}': {}", view, e);
                *self.current_view.borrow_mut() = None;
                if let Err(mount_err) = self.shell.replace_mount(&fragment::error_markup(view, &e.to_string())) {
                    log::error!("[ROUTER] Could not show error: {}", mount_err);
                }
                NavOutcome::Failed(view)
            }
        }
    }

    async fn render(&self, view: &'static str) -> Result<(), RouterError> {
        let raw = self.shell.fetch_fragment(view).await?;
        let fragment = fragment::parse(&raw);
        for href in &fragment.stylesheets {
            self.shell.install_stylesheet(href)?;
        }
        self.shell.replace_mount(&fragment.html)?;
        self.shell.run_setup(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use futures::executor::block_on;
    use futures::FutureExt;

    use crate::board::tests::{task, FakeTasks};
    use crate::board::{self, LoadOutcome};
    use crate::models::{TaskStatus, User};
    use crate::session::TOKEN_KEY;

    #[derive(Default)]
    struct FakeShell {
        location: RefCell<Location>,
        fetched: RefCell<Vec<String>>,
        pushed: RefCell<Vec<String>>,
        stylesheets: RefCell<Vec<String>>,
        setups: RefCell<Vec<String>>,
        mount: RefCell<String>,
        missing: HashSet<&'static str>,
        navigated: RefCell<Vec<&'static str>>,
        /// Backend the dashboard setup loads from
        tasks: FakeTasks,
        loaded: RefCell<Option<LoadOutcome>>,
    }

    impl Shell for FakeShell {
        fn location(&self) -> Location {
            self.location.borrow().clone()
        }

        fn push_history(&self, url: &str) {
            self.pushed.borrow_mut().push(url.to_string());
            let (path, search) = url.split_once('?').map(|(p, q)| (p, format!("?{}", q))).unwrap_or((url, String::new()));
            *self.location.borrow_mut() = Location::new(path, &search, "");
        }

        async fn fetch_fragment(&self, view: &str) -> Result<String, RouterError> {
            self.fetched.borrow_mut().push(view.to_string());
            if self.missing.contains(view) {
                return Err(RouterError::FragmentFetch { view: view.to_string(), reason: "404".into() });
            }
            Ok(format!(r#"<link rel="stylesheet" href="/styles/{0}.css"><main data-view-root>{0}</main>"#, view))
        }

        fn install_stylesheet(&self, href: &str) -> Result<(), RouterError> {
            let mut sheets = self.stylesheets.borrow_mut();
            if !sheets.iter().any(|s| s == href) {
                sheets.push(href.to_string());
            }
            Ok(())
        }

        fn replace_mount(&self, html: &str) -> Result<(), RouterError> {
            *self.mount.borrow_mut() = html.to_string();
            Ok(())
        }

        fn run_setup(&self, view: &str) -> Result<(), RouterError> {
            self.setups.borrow_mut().push(view.to_string());
            if view == "dashboard" {
                *self.loaded.borrow_mut() = board::load(&self.tasks).now_or_never();
            }
            Ok(())
        }

        fn mount_healthy(&self) -> bool {
            let mount = self.mount.borrow();
            !mount.trim().is_empty() && !mount.contains("Error al cargar")
        }

        fn after_navigation(&self, view: &'static str) {
            self.navigated.borrow_mut().push(view);
        }
    }

    fn router(token: Option<&str>) -> Router<FakeShell> {
        let session = Session::memory();
        if let Some(token) = token {
            session.set(TOKEN_KEY, token);
        }
        Router::new(FakeShell::default(), session)
    }

    #[test]
    fn test_protected_route_without_session_shows_login() {
        let router = router(None);
        assert_eq!(block_on(router.navigate("dashboard")), NavOutcome::Rendered("login"));
        assert_eq!(*router.shell().fetched.borrow(), vec!["login".to_string()]);
        assert_eq!(*router.shell().pushed.borrow(), vec!["/login".to_string()]);
    }

    #[test]
    fn test_same_view_loads_once() {
        let router = router(Some("tok"));
        block_on(router.navigate_to("dashboard", false));
        assert_eq!(block_on(router.navigate_to("dashboard", false)), NavOutcome::Unchanged("dashboard"));
        assert_eq!(router.shell().fetched.borrow().len(), 1);
        assert_eq!(router.shell().setups.borrow().len(), 1);

        assert_eq!(block_on(router.navigate_to("dashboard", true)), NavOutcome::Rendered("dashboard"));
        assert_eq!(router.shell().fetched.borrow().len(), 2);
        assert_eq!(router.shell().stylesheets.borrow().len(), 1);
    }

    #[test]
    fn test_reset_without_token_never_fetches_reset() {
        let router = router(None);
        assert_eq!(block_on(router.navigate("reset")), NavOutcome::Rendered("recovery"));
        assert_eq!(*router.shell().fetched.borrow(), vec!["recovery".to_string()]);
    }

    #[test]
    fn test_reset_keeps_query_string() {
        let router = router(None);
        *router.shell().location.borrow_mut() = Location::new("/", "?token=abc", "");
        assert_eq!(block_on(router.navigate("reset")), NavOutcome::Rendered("reset"));
        assert_eq!(*router.shell().pushed.borrow(), vec!["/reset?token=abc".to_string()]);
    }

    #[test]
    fn test_mount_gets_markup_without_links() {
        let router = router(None);
        block_on(router.navigate("signup"));
        assert_eq!(*router.shell().mount.borrow(), "<main data-view-root>signup</main>");
        assert_eq!(*router.shell().stylesheets.borrow(), vec!["/styles/signup.css".to_string()]);
        assert_eq!(router.current_view(), Some("signup"));
    }

    #[test]
    fn test_failed_load_renders_error_and_retries_once() {
        let mut shell = FakeShell::default();
        shell.missing.insert("calendar");
        let session = Session::memory();
        session.set(TOKEN_KEY, "tok");
        let router = Router::new(shell, session);

        assert_eq!(block_on(router.navigate("calendar")), NavOutcome::Failed("calendar"));
        assert!(router.shell().mount.borrow().starts_with("<h2>Error al cargar calendar</h2>"));
        assert_eq!(router.current_view(), None);

        assert_eq!(block_on(router.verify_loaded()), Some(NavOutcome::Failed("calendar")));
        assert_eq!(block_on(router.verify_loaded()), None);
        assert_eq!(router.shell().fetched.borrow().len(), 2);
    }

    #[test]
    fn test_popstate_ignored_while_navigating() {
        let router = router(None);
        let guard = router.lock.try_lock();
        assert!(guard.is_some());
        assert_eq!(block_on(router.handle_routing()), NavOutcome::Skipped);
        drop(guard);
        assert!(!router.is_navigating());
        assert_eq!(block_on(router.handle_routing()), NavOutcome::Rendered("home"));
    }

    #[test]
    fn test_root_with_session_routes_to_dashboard() {
        let router = router(Some("tok"));
        *router.shell().location.borrow_mut() = Location::new("/", "", "");
        assert_eq!(block_on(router.handle_routing()), NavOutcome::Rendered("dashboard"));
    }

    #[test]
    fn test_only_rendered_views_reach_after_navigation() {
        let router = router(None);
        block_on(router.navigate("dashboard"));
        block_on(router.navigate("signup"));
        block_on(router.navigate("signup"));
        assert_eq!(*router.shell().navigated.borrow(), vec!["login", "signup"]);
    }

    #[test]
    fn test_login_then_dashboard_fetches_tasks() {
        let session = Session::memory();
        let shell = FakeShell::default();
        shell.tasks.tasks.borrow_mut().push(task("1", "2024-05-01", TaskStatus::Todo));
        let router = Router::new(shell, session.clone());

        assert_eq!(block_on(router.navigate_to("dashboard", true)), NavOutcome::Rendered("login"));
        assert!(router.shell().tasks.calls.borrow().is_empty());

        let user = User { first_name: "Ana".into(), ..Default::default() };
        session.store_login("jwt", &user);
        assert_eq!(block_on(router.navigate_to("dashboard", true)), NavOutcome::Rendered("dashboard"));

        assert_eq!(*router.shell().tasks.calls.borrow(), vec!["GET /tasks".to_string()]);
        assert!(matches!(
            router.shell().loaded.borrow().as_ref(),
            Some(LoadOutcome::Loaded(tasks)) if tasks.len() == 1
        ));
        assert_eq!(*router.shell().pushed.borrow(), vec!["/login".to_string(), "/dashboard".to_string()]);
    }
}
