//! Session-aware navigation shared by the login flow and route guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both the post-login step and the login page's on-mount check end the same
//! way: consume the pending redirect target if there is one, else go to the
//! landing path. Protected pages do the reverse and bounce to `/login`,
//! remembering where the user was headed.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{BrowserSessions, SessionStore};
use crate::util::storage::KeyValueStore;

/// Navigate to the pending redirect target (consuming it) or `default_path`.
/// Returns the path navigated to.
pub fn navigate_after_login<S, F>(sessions: &SessionStore<S>, default_path: &str, navigate: F) -> String
where
    S: KeyValueStore,
    F: FnOnce(&str),
{
    let target = sessions
        .take_redirect()
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| default_path.to_owned());
    navigate(&target);
    target
}

/// If a session already exists, navigate away as a successful login would.
/// Returns whether a redirect happened.
pub fn redirect_if_authenticated<S, F>(sessions: &SessionStore<S>, default_path: &str, navigate: F) -> bool
where
    S: KeyValueStore,
    F: FnOnce(&str),
{
    if !sessions.has_session() {
        return false;
    }
    let target = navigate_after_login(sessions, default_path, navigate);
    log::debug!("existing session found; redirecting to {target}");
    true
}

/// If no session exists, remember `current_path` and navigate to `login_path`.
/// Returns whether a redirect happened.
pub fn redirect_if_unauthenticated<S, F>(
    sessions: &SessionStore<S>,
    current_path: &str,
    login_path: &str,
    navigate: F,
) -> bool
where
    S: KeyValueStore,
    F: FnOnce(&str),
{
    if sessions.has_session() {
        return false;
    }
    if current_path != login_path {
        sessions.remember_redirect(current_path);
    }
    navigate(login_path);
    true
}

/// Join a location's path and query string into one redirect target. `search`
/// may come with or without its leading `?`.
pub fn path_with_query(pathname: &str, search: &str) -> String {
    let query = search.strip_prefix('?').unwrap_or(search);
    if query.is_empty() { pathname.to_owned() } else { format!("{pathname}?{query}") }
}

/// Only same-origin absolute paths are honored as redirect targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}

/// Run the "already signed in?" check once when the calling component mounts.
pub fn install_session_redirect<F>(sessions: BrowserSessions, default_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let navigate = navigate.clone();
        redirect_if_authenticated(&sessions, &default_path, |path| {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        });
    });
}

/// Bounce to the login page on mount when no session exists.
pub fn install_unauth_redirect<F>(sessions: BrowserSessions, current_path: String, login_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let navigate = navigate.clone();
        redirect_if_unauthenticated(&sessions, &current_path, &login_path, |path| {
            navigate(path, NavigateOptions::default());
        });
    });
}
