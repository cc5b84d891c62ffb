//! Route Table
//!
//! Single-level mapping from URL routes to view names, plus the guards that
//! turn a requested view into the one actually shown.

use percent_encoding::percent_decode_str;

/// Every registered view
pub const VIEWS: [&str; 10] = [
    "home",
    "login",
    "signup",
    "recovery",
    "reset",
    "dashboard",
    "profile",
    "profile-edit",
    "calendar",
    "auth-callback",
];

/// Views that need a stored token
pub const PROTECTED: [&str; 4] = ["dashboard", "profile", "profile-edit", "calendar"];

/// Snapshot of `window.location`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub pathname: String,
    /// Including the leading `?`, or empty
    pub search: String,
    /// Including the leading `#`, or empty
    pub hash: String,
}

impl Location {
    pub fn new(pathname: &str, search: &str, hash: &str) -> Self {
        Self {
            pathname: pathname.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }
}

/// Map a route key to its view; unknown routes go to login
pub fn resolve(route: &str) -> &'static str {
    let route = route.trim_matches('/');
    match route {
        "" | "index.html" | "home" => "home",
        "profile/edit" | "profile-edit" => "profile-edit",
        other => VIEWS.into_iter().find(|v| *v == other).unwrap_or("login"),
    }
}

pub fn is_protected(view: &str) -> bool {
    PROTECTED.contains(&view)
}

/// Route key for the current location; a hash route wins over the path
pub fn current_route(location: &Location, has_token: bool) -> String {
    let hash = location.hash.trim_start_matches('#');
    let hash = hash.split('?').next().unwrap_or_default().trim_matches('/');
    if !hash.is_empty() {
        return hash.to_string();
    }
    let path = location.pathname.trim_matches('/');
    if path.is_empty() || path == "index.html" {
        return if has_token { "dashboard" } else { "home" }.to_string();
    }
    path.to_string()
}

/// View for a location, before guards
pub fn view_for_location(location: &Location, has_token: bool) -> &'static str {
    resolve(&current_route(location, has_token))
}

/// Apply the session and reset-token guards
pub fn effective_view(view: &'static str, has_token: bool, search: &str) -> &'static str {
    if is_protected(view) && !has_token {
        log::warn!("[ROUTER] '{}' needs a session, showing login", view);
        return "login";
    }
    if view == "reset" && query_param(search, "token").is_none() {
        log::warn!("[ROUTER] Reset without token, showing recovery");
        return "recovery";
    }
    view
}

/// URL pushed to history for a view; reset keeps the query string
pub fn url_for(view: &str, search: &str) -> String {
    match view {
        "home" => "/".to_string(),
        "reset" => format!("/reset{}", search),
        other => format!("/{}", other),
    }
}

/// Non-empty, decoded query parameter
pub fn query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode(key) == name)
        .map(|(_, value)| decode(value))
        .filter(|value| !value.is_empty())
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(resolve(""), "home");
        assert_eq!(resolve("/"), "home");
        assert_eq!(resolve("index.html"), "home");
        assert_eq!(resolve("profile/edit"), "profile-edit");
        assert_eq!(resolve("calendar"), "calendar");
        assert_eq!(resolve("auth-callback"), "auth-callback");
        assert_eq!(resolve("admin"), "login");
    }

    #[test]
    fn test_root_with_token_is_dashboard() {
        let root = Location::new("/", "", "");
        assert_eq!(view_for_location(&root, true), "dashboard");
        assert_eq!(view_for_location(&root, false), "home");
    }

    #[test]
    fn test_hash_route_wins() {
        let loc = Location::new("/dashboard", "", "#/signup");
        assert_eq!(view_for_location(&loc, true), "signup");
        let loc = Location::new("/profile/edit", "", "");
        assert_eq!(view_for_location(&loc, true), "profile-edit");
    }

    #[test]
    fn test_guards() {
        for view in PROTECTED {
            assert_eq!(effective_view(view, false, ""), "login");
            assert_eq!(effective_view(view, true, ""), view);
        }
        assert_eq!(effective_view("reset", false, ""), "recovery");
        assert_eq!(effective_view("reset", false, "?token="), "recovery");
        assert_eq!(effective_view("reset", false, "?token=abc"), "reset");
    }

    #[test]
    fn test_urls() {
        assert_eq!(url_for("home", "?x=1"), "/");
        assert_eq!(url_for("reset", "?token=abc"), "/reset?token=abc");
        assert_eq!(url_for("profile-edit", "?x=1"), "/profile-edit");
    }

    #[test]
    fn test_query_param_decoding() {
        assert_eq!(query_param("?token=a%2Bb&x=1", "token").as_deref(), Some("a+b"));
        assert_eq!(query_param("?user=%7B%22firstName%22%3A%22Ana%22%7D", "user").as_deref(), Some("{\"firstName\":\"Ana\"}"));
        assert_eq!(query_param("?flag", "flag"), None);
        assert_eq!(query_param("", "token"), None);
    }
}
