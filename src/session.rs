//! User Session
//!
//! Bearer token and user record persisted in `localStorage`, behind a small
//! storage trait so session logic runs without a browser.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const LOGOUT_MESSAGE_KEY: &str = "logout_message";
pub const THEME_KEY: &str = "theme";
pub const DASHBOARD_REDIRECT_KEY: &str = "needs_dashboard_redirect";
pub const GOOGLE_ATTEMPT_KEY: &str = "google_auth_attempt";

/// Key/value persistence used by the session
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl SessionStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("[SESSION] Could not persist '{}'", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl SessionStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Validity of a stored token judged from its JWT payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    Expired,
    Malformed,
}

/// Inspect the `exp` claim (seconds) against `now_secs`.
/// Tokens without `exp` are accepted.
pub fn token_state(token: &str, now_secs: i64) -> TokenState {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return TokenState::Malformed,
    };
    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(_) => return TokenState::Malformed,
    };
    let claims: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(claims) => claims,
        Err(_) => return TokenState::Malformed,
    };
    match claims.get("exp").and_then(serde_json::Value::as_i64) {
        Some(exp) if exp <= now_secs => TokenState::Expired,
        _ => TokenState::Valid,
    }
}

/// Session handle shared through the app context
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Rc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    pub fn memory() -> Self {
        Self::new(Rc::new(MemoryStorage::default()))
    }

    /// Non-empty bearer token
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.store
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn store_login(&self, token: &str, user: &User) {
        self.store.set(TOKEN_KEY, token);
        self.store_user(user);
    }

    pub fn store_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set(USER_KEY, &raw),
            Err(e) => log::error!("[SESSION] Failed to encode user: {}", e),
        }
    }

    /// Drop token and user
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    pub fn set_logout_message(&self, message: &str) {
        self.store.set(LOGOUT_MESSAGE_KEY, message);
    }

    /// Read and clear the message left by the last logout
    pub fn take_logout_message(&self) -> Option<String> {
        let message = self.store.get(LOGOUT_MESSAGE_KEY);
        self.store.remove(LOGOUT_MESSAGE_KEY);
        message.filter(|m| !m.is_empty())
    }

    /// Token state now; `None` when no token is stored
    pub fn token_state(&self, now_secs: i64) -> Option<TokenState> {
        self.token().map(|t| token_state(&t, now_secs))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    pub fn set(&self, key: &str, value: &str) {
        self.store.set(key, value);
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: &str) -> String {
        format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(claims))
    }

    #[test]
    fn test_empty_token_is_not_a_session() {
        let session = Session::memory();
        assert!(!session.is_authenticated());
        session.set(TOKEN_KEY, "  ");
        assert!(!session.is_authenticated());
        session.set(TOKEN_KEY, "abc");
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_login_and_clear() {
        let session = Session::memory();
        let user = User { first_name: "Ana".into(), email: "ana@x.co".into(), ..Default::default() };
        session.store_login("tok", &user);
        assert_eq!(session.user().map(|u| u.first_name), Some("Ana".to_string()));
        session.clear();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_logout_message_is_consumed_once() {
        let session = Session::memory();
        session.set_logout_message("Sesión cerrada correctamente");
        assert_eq!(session.take_logout_message().as_deref(), Some("Sesión cerrada correctamente"));
        assert_eq!(session.take_logout_message(), None);
    }

    #[test]
    fn test_token_expiry() {
        assert_eq!(token_state(&jwt(r#"{"exp":2000}"#), 1000), TokenState::Valid);
        assert_eq!(token_state(&jwt(r#"{"exp":1000}"#), 1000), TokenState::Expired);
        assert_eq!(token_state(&jwt(r#"{"sub":"u1"}"#), 1000), TokenState::Valid);
        assert_eq!(token_state("not-a-jwt", 1000), TokenState::Malformed);
        assert_eq!(token_state("a.%%%.c", 1000), TokenState::Malformed);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_round_trips_session() {
        let session = Session::browser();
        session.clear();
        let user = User { first_name: "Ana".into(), ..Default::default() };
        session.store_login("tok", &user);

        let reopened = Session::browser();
        assert_eq!(reopened.token().as_deref(), Some("tok"));
        assert_eq!(reopened.user().map(|u| u.first_name).as_deref(), Some("Ana"));

        reopened.clear();
        assert!(!Session::browser().is_authenticated());
    }

    #[wasm_bindgen_test]
    fn logout_message_survives_reload_once() {
        Session::browser().set_logout_message("Sesión cerrada correctamente");
        assert!(Session::browser().take_logout_message().is_some());
        assert!(Session::browser().take_logout_message().is_none());
    }
}
