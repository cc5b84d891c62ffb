//! Router Shell
//!
//! Everything the router touches outside itself: location and history, the
//! fragment fetch, `<head>` and the `#app` mount node.

use std::cell::RefCell;

use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use super::routes::Location;
use crate::context::AppContext;
use crate::error::RouterError;
use crate::footer;
use crate::views::{self, ViewHandle};

#[allow(async_fn_in_trait)]
pub trait Shell {
    fn location(&self) -> Location;
    fn push_history(&self, url: &str);
    async fn fetch_fragment(&self, view: &str) -> Result<String, RouterError>;
    /// Append a stylesheet link unless one with the same href exists
    fn install_stylesheet(&self, href: &str) -> Result<(), RouterError>;
    /// Unmount the active view and replace the mount node's markup
    fn replace_mount(&self, html: &str) -> Result<(), RouterError>;
    fn run_setup(&self, view: &str) -> Result<(), RouterError>;
    /// Mount shows something other than nothing or a load error
    fn mount_healthy(&self) -> bool;
    fn after_navigation(&self, view: &'static str);
}

/// Shell over the real DOM
pub struct BrowserShell {
    ctx: AppContext,
    active: RefCell<Option<ViewHandle>>,
}

impl BrowserShell {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, active: RefCell::new(None) }
    }

    fn document() -> Result<web_sys::Document, RouterError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| RouterError::Dom("document unavailable".into()))
    }

    fn mount_node() -> Result<web_sys::HtmlElement, RouterError> {
        Self::document()?
            .get_element_by_id("app")
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            .ok_or(RouterError::MountMissing)
    }

    /// `[data-view-root]` inside the mount node, or the node itself
    fn view_root() -> Result<web_sys::HtmlElement, RouterError> {
        let app = Self::mount_node()?;
        let root = app
            .query_selector("[data-view-root]")?
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        Ok(root.unwrap_or(app))
    }

    fn fragment_url(&self, view: &str) -> String {
        let config = self.ctx.config();
        let url = format!("{}/{}.html", config.views_path, view);
        if config.cache_bust {
            format!("{}?v={}", url, js_sys::Date::now() as u64)
        } else {
            url
        }
    }
}

impl Shell for BrowserShell {
    fn location(&self) -> Location {
        let Some(location) = web_sys::window().map(|w| w.location()) else {
            return Location::default();
        };
        Location {
            pathname: location.pathname().unwrap_or_default(),
            search: location.search().unwrap_or_default(),
            hash: location.hash().unwrap_or_default(),
        }
    }

    fn push_history(&self, url: &str) {
        let history = web_sys::window().and_then(|w| w.history().ok());
        if let Some(history) = history {
            if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(url)) {
                log::warn!("[ROUTER] pushState failed: {:?}", e);
            }
        }
    }

    async fn fetch_fragment(&self, view: &str) -> Result<String, RouterError> {
        let fetch_error = |reason: String| RouterError::FragmentFetch { view: view.to_string(), reason };
        let response = Request::get(&self.fragment_url(view))
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.ok() {
            return Err(fetch_error(format!("{} {}", response.status(), response.status_text())));
        }
        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }

    fn install_stylesheet(&self, href: &str) -> Result<(), RouterError> {
        let document = Self::document()?;
        let selector = format!("link[href=\"{}\"]", href.replace('"', "\\\""));
        if document.query_selector(&selector)?.is_some() {
            return Ok(());
        }
        let link = document
            .create_element("link")?
            .dyn_into::<web_sys::HtmlLinkElement>()
            .map_err(|_| RouterError::Dom("link element".into()))?;
        link.set_rel("stylesheet");
        link.set_href(href);
        let head = document.head().ok_or_else(|| RouterError::Dom("missing <head>".into()))?;
        head.append_child(&link)?;
        Ok(())
    }

    fn replace_mount(&self, html: &str) -> Result<(), RouterError> {
        let app = Self::mount_node()?;
        // Dropping the handle unmounts the previous view and disposes its owner
        drop(self.active.borrow_mut().take());
        app.set_inner_html(html);
        Ok(())
    }

    fn run_setup(&self, view: &str) -> Result<(), RouterError> {
        let setup = views::setup_for(view).ok_or_else(|| RouterError::ViewNotRegistered(view.to_string()))?;
        let root = Self::view_root()?;
        let handle = setup(self.ctx, root);
        *self.active.borrow_mut() = Some(handle);
        Ok(())
    }

    fn mount_healthy(&self) -> bool {
        match Self::mount_node() {
            Ok(app) => {
                let html = app.inner_html();
                !html.trim().is_empty() && !html.contains("Error al cargar")
            }
            Err(_) => false,
        }
    }

    fn after_navigation(&self, view: &'static str) {
        self.ctx.set_route(view);
        if let Err(e) = footer::apply_layout(footer::layout_for(view)) {
            log::warn!("[FOOTER] Layout update failed: {:?}", e);
        }
        footer::scroll_to_top();
    }
}
