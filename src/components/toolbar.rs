//! Top bar with the signed-in user's name and the logout action.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::AppConfig;
use crate::query::cache::QueryCache;
use crate::query::menu::menu_query_key;
use crate::state::session::BrowserSessions;

#[component]
pub fn Toolbar() -> impl IntoView {
    let sessions = expect_context::<BrowserSessions>();
    let config = expect_context::<AppConfig>();
    let cache = expect_context::<QueryCache>();
    let navigate = use_navigate();

    // Storage is only readable in the browser, so fill the name after mount.
    let user_name = RwSignal::new(String::new());
    let name_sessions = sessions.clone();
    Effect::new(move || {
        user_name.set(name_sessions.user().map(|u| u.name).unwrap_or_default());
    });

    let on_logout = move |_| {
        sessions.clear();
        cache.remove(&menu_query_key());
        log::info!("signed out");
        navigate(&config.login_path, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <div class="toolbar">
            <a href="/" class="toolbar__title">"Admin Console"</a>
            <span class="toolbar__spacer"></span>
            <span class="toolbar__self">{move || user_name.get()}</span>
            <button class="btn toolbar__logout" on:click=on_logout title="Sign out">
                "Logout"
            </button>
        </div>
    }
}
