//! Authenticated page frame: toolbar, menu sidebar and content area.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route renders inside this frame. It bounces visitors
//! without a session to the login page and loads the menu tree through the
//! shared query cache, refetching it when the browser comes back online.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::menu_tree::MenuTree;
use crate::components::toolbar::Toolbar;
use crate::config::AppConfig;
use crate::net::types::MenuNode;
use crate::state::session::BrowserSessions;
use crate::util::redirect::{install_unauth_redirect, path_with_query};

#[component]
pub fn ProtectedLayout(children: Children) -> impl IntoView {
    let sessions = expect_context::<BrowserSessions>();
    let config = expect_context::<AppConfig>();
    let location = use_location();
    install_unauth_redirect(
        sessions.clone(),
        path_with_query(&location.pathname.get_untracked(), &location.search.get_untracked()),
        config.login_path.clone(),
        use_navigate(),
    );

    let menu = RwSignal::new(Vec::<MenuNode>::new());
    let menu_error = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    {
        use crate::net::api::HttpApi;
        use crate::query::cache::QueryCache;
        use crate::query::menu::MenuQuery;

        let cache = expect_context::<QueryCache>();
        // Token is read per request; a re-login may have replaced it.
        let menu_query = move || MenuQuery::new(cache.clone(), HttpApi::for_session(&config, &sessions));

        if let Some(cached) = menu_query().read_cached_only() {
            menu.set(cached);
        }

        let initial = menu_query();
        leptos::task::spawn_local(async move {
            match initial.read().await {
                Ok(tree) => menu.set(tree),
                Err(e) => {
                    log::warn!("menu load failed: {e}");
                    menu_error.set(true);
                }
            }
        });

        let reconnect = menu_query.clone();
        let online = window_event_listener(leptos::ev::online, move |_| {
            let query = reconnect();
            leptos::task::spawn_local(async move {
                if let Some(Ok(tree)) = query.on_reconnect().await {
                    menu_error.set(false);
                    menu.set(tree);
                }
            });
        });
        let focus = window_event_listener(leptos::ev::focus, move |_| {
            let query = menu_query();
            leptos::task::spawn_local(async move {
                if let Some(Ok(tree)) = query.on_window_focus().await {
                    menu.set(tree);
                }
            });
        });
        on_cleanup(move || {
            online.remove();
            focus.remove();
        });
    }

    view! {
        <div class="console">
            <Toolbar/>
            <div class="console__body">
                <aside class="console__menu">
                    <Show when=move || menu_error.get()>
                        <p class="console__menu-error">"Menu unavailable"</p>
                    </Show>
                    <MenuTree nodes=menu/>
                </aside>
                <main class="console__content">{children()}</main>
            </div>
        </div>
    }
}
