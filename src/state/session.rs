//! Persisted client session: the (token, user) pair and the pending redirect.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login writes the pair into exactly one store, chosen by the "remember me"
//! flag. The redirect guard and the HTTP client read it back on later mounts.
//!
//! DESIGN
//! ======
//! Writes always go to a single store as a pair. Reads used for the
//! "already signed in?" check resolve each key independently (session store
//! first, then the persistent store), so a token and user record found in
//! different stores still count as a session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::config::keys;
use crate::net::types::{Session, SessionUser};
use crate::util::storage::{BrowserStore, KeyValueStore, load_json, save_json};

/// Which store holds (or should hold) the session pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreScope {
    /// Cleared when the browser tab closes.
    Session,
    /// Survives restarts.
    Persistent,
}

impl StoreScope {
    pub fn for_remember(remember: bool) -> Self {
        if remember { Self::Persistent } else { Self::Session }
    }
}

/// Session adapter over a session-scoped and a persistent store.
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    session: S,
    persistent: S,
}

/// The store pair used in the browser.
pub type BrowserSessions = SessionStore<BrowserStore>;

impl BrowserSessions {
    pub fn browser() -> Self {
        Self::new(BrowserStore::Session, BrowserStore::Local)
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(session: S, persistent: S) -> Self {
        Self { session, persistent }
    }

    pub fn store(&self, scope: StoreScope) -> &S {
        match scope {
            StoreScope::Session => &self.session,
            StoreScope::Persistent => &self.persistent,
        }
    }

    /// Persist `session` as a pair in the store selected by `remember`, and
    /// drop any pair left in the other store by an earlier login.
    pub fn save(&self, session: &Session, remember: bool) {
        let scope = StoreScope::for_remember(remember);
        let target = self.store(scope);
        target.set(keys::TOKEN, &session.token);
        save_json(target, keys::USER, &session.user);

        let other = self.store(match scope {
            StoreScope::Session => StoreScope::Persistent,
            StoreScope::Persistent => StoreScope::Session,
        });
        other.remove(keys::TOKEN);
        other.remove(keys::USER);
        log::debug!("session saved to {scope:?} store for {}", session.user.account);
    }

    /// Read the pair from a single store; `None` unless both halves are there.
    pub fn load_from(&self, scope: StoreScope) -> Option<Session> {
        let store = self.store(scope);
        let token = non_empty(store.get(keys::TOKEN))?;
        let user = load_json::<SessionUser>(store, keys::USER)?;
        Some(Session { token, user })
    }

    /// Whether the current pair lives in the persistent store, i.e. the user
    /// asked to be remembered.
    pub fn is_remembered(&self) -> bool {
        self.load_from(StoreScope::Persistent).is_some()
    }

    /// Token from the session store, falling back to the persistent store.
    pub fn token(&self) -> Option<String> {
        self.read_either(keys::TOKEN)
    }

    /// User record from the session store, falling back to the persistent store.
    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.read_either(keys::USER)?;
        serde_json::from_str(&raw).ok()
    }

    /// True when a token and a user record are both present, each resolved
    /// independently across the two stores.
    pub fn has_session(&self) -> bool {
        self.read_either(keys::TOKEN).is_some() && self.read_either(keys::USER).is_some()
    }

    /// Remove the session pair from both stores and forget any pending redirect.
    pub fn clear(&self) {
        for store in [&self.session, &self.persistent] {
            store.remove(keys::TOKEN);
            store.remove(keys::USER);
        }
        self.session.remove(keys::REDIRECT);
    }

    /// Remember where to send the user once they have signed in.
    pub fn remember_redirect(&self, path: &str) {
        if path.is_empty() {
            return;
        }
        self.session.set(keys::REDIRECT, path);
    }

    /// Read and delete the pending redirect target.
    pub fn take_redirect(&self) -> Option<String> {
        let target = non_empty(self.session.get(keys::REDIRECT));
        self.session.remove(keys::REDIRECT);
        target
    }

    fn read_either(&self, key: &str) -> Option<String> {
        non_empty(self.session.get(key)).or_else(|| non_empty(self.persistent.get(key)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
