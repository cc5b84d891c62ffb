//! Footer & Layout Manager
//!
//! Decides per view whether the shared footer is shown and switches the
//! body/#app containers between the sticky-footer layout and the plain one.
//! Also owns the persisted light/dark theme.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use crate::session::{Session, THEME_KEY};

/// Views that render the shared footer
pub const FOOTER_VIEWS: [&str; 9] = [
    "home",
    "login",
    "signup",
    "recovery",
    "reset",
    "dashboard",
    "profile",
    "profile-edit",
    "calendar",
];

pub fn should_show(view: &str) -> bool {
    FOOTER_VIEWS.contains(&view)
}

/// Container styles for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    pub footer: bool,
    /// `#app` padding when the footer layout is active
    pub app_padding: &'static str,
}

pub fn layout_for(view: &str) -> LayoutPlan {
    LayoutPlan {
        footer: should_show(view),
        app_padding: if view == "home" { "0" } else { "2rem" },
    }
}

const BODY_STYLES: [(&str, &str); 5] = [
    ("min-height", "100vh"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("place-items", "stretch"),
    ("justify-content", "flex-start"),
];

const APP_STYLES: [(&str, &str); 8] = [
    ("flex", "1"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("justify-content", "center"),
    ("align-items", "center"),
    ("max-width", "1280px"),
    ("margin", "0 auto"),
    ("text-align", "center"),
];

fn html_element(el: web_sys::Element) -> Option<web_sys::HtmlElement> {
    el.dyn_into::<web_sys::HtmlElement>().ok()
}

/// Apply or reset the footer layout on `<body>` and `#app`
pub fn apply_layout(plan: LayoutPlan) -> Result<(), JsValue> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let body = document.body();
    let app = document.get_element_by_id("app").and_then(html_element);

    if plan.footer {
        if let Some(body) = &body {
            let style = body.style();
            for (name, value) in BODY_STYLES {
                style.set_property(name, value)?;
            }
            body.class_list().add_1("footer-ready")?;
        }
        if let Some(app) = &app {
            let style = app.style();
            for (name, value) in APP_STYLES {
                style.set_property(name, value)?;
            }
            style.set_property("padding", plan.app_padding)?;
            app.class_list().add_1("footer-app")?;
        }
    } else {
        if let Some(body) = &body {
            let style = body.style();
            for (name, _) in BODY_STYLES {
                style.remove_property(name)?;
            }
            body.class_list().remove_1("footer-ready")?;
        }
        if let Some(app) = &app {
            let style = app.style();
            for (name, _) in APP_STYLES {
                style.remove_property(name)?;
            }
            style.remove_property("padding")?;
            app.class_list().remove_1("footer-app")?;
        }
    }
    Ok(())
}

pub fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

// ========================
// Theme
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub fn stored_theme(session: &Session) -> Theme {
    session
        .get(THEME_KEY)
        .and_then(|v| Theme::parse(&v))
        .unwrap_or_default()
}

/// Set `data-theme` on `<html>`
pub fn apply_theme(theme: Theme) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        if let Err(e) = root.set_attribute("data-theme", theme.as_str()) {
            log::warn!("[FOOTER] Could not apply theme: {:?}", e);
        }
    }
}

/// Flip, persist and apply the theme
pub fn toggle_theme(session: &Session) -> Theme {
    let next = stored_theme(session).toggled();
    session.set(THEME_KEY, next.as_str());
    apply_theme(next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_hidden_only_on_auth_callback() {
        assert!(should_show("dashboard"));
        assert!(should_show("profile-edit"));
        assert!(!should_show("auth-callback"));
    }

    #[test]
    fn test_home_has_no_padding() {
        assert_eq!(layout_for("home"), LayoutPlan { footer: true, app_padding: "0" });
        assert_eq!(layout_for("login").app_padding, "2rem");
        assert!(!layout_for("auth-callback").footer);
    }

    #[test]
    fn test_theme_persistence() {
        let session = Session::memory();
        assert_eq!(stored_theme(&session), Theme::Light);
        session.set(THEME_KEY, "dark");
        assert_eq!(stored_theme(&session), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        session.set(THEME_KEY, "sepia");
        assert_eq!(stored_theme(&session), Theme::Light);
    }
}
