//! View Fragments
//!
//! A fragment is the HTML served for a view. Its stylesheet links are pulled
//! out so they can live in `<head>`; the rest goes into the mount node.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static LINK_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid link regex"));

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)([a-z][a-z0-9-]*)\s*=\s*["']([^"']*)["']"#).expect("valid attribute regex"));

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    /// Markup with stylesheet links removed
    pub html: String,
    /// Stylesheet hrefs in document order
    pub stylesheets: Vec<String>,
}

fn stylesheet_href(tag: &str) -> Option<String> {
    let mut rel = None;
    let mut href = None;
    for caps in ATTRIBUTE.captures_iter(tag) {
        match caps[1].to_ascii_lowercase().as_str() {
            "rel" => rel = Some(caps[2].to_ascii_lowercase()),
            "href" => href = Some(caps[2].to_string()),
            _ => {}
        }
    }
    match (rel.as_deref(), href) {
        (Some("stylesheet"), Some(href)) if !href.is_empty() => Some(href),
        _ => None,
    }
}

pub fn parse(raw: &str) -> Fragment {
    let mut stylesheets = Vec::new();
    let html = LINK_TAG
        .replace_all(raw, |caps: &Captures| match stylesheet_href(&caps[0]) {
            Some(href) => {
                if !stylesheets.contains(&href) {
                    stylesheets.push(href);
                }
                String::new()
            }
            None => caps[0].to_string(),
        })
        .trim()
        .to_string();
    Fragment { html, stylesheets }
}

/// Escape text for inclusion in markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline markup shown when a view fails to load
pub fn error_markup(view: &str, message: &str) -> String {
    format!(
        "<h2>Error al cargar {}</h2><p>{}</p>",
        escape_html(view),
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_stylesheets_in_any_attribute_order() {
        let raw = r#"<link rel="stylesheet" href="/styles/login.css">
<link href='/styles/shared.css' rel='stylesheet' />
<link rel="icon" href="/favicon.svg">
<section data-view-root></section>"#;
        let fragment = parse(raw);
        assert_eq!(fragment.stylesheets, vec!["/styles/login.css", "/styles/shared.css"]);
        assert!(fragment.html.contains("rel=\"icon\""));
        assert!(fragment.html.ends_with("<section data-view-root></section>"));
        assert!(!fragment.html.contains("login.css"));
    }

    #[test]
    fn test_duplicate_links_are_listed_once() {
        let raw = r#"<link rel="stylesheet" href="/a.css"><link rel="stylesheet" href="/a.css"><p>x</p>"#;
        let fragment = parse(raw);
        assert_eq!(fragment.stylesheets, vec!["/a.css"]);
        assert_eq!(fragment.html, "<p>x</p>");
    }

    #[test]
    fn test_error_markup_escapes_message() {
        assert_eq!(
            error_markup("dashboard", "<b>404</b>"),
            "<h2>Error al cargar dashboard</h2><p>&lt;b&gt;404&lt;/b&gt;</p>"
        );
    }
}
