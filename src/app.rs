//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::login_dialog::LoginDialogProvider;
use crate::components::toast_host::ToastHost;
use crate::config::AppConfig;
use crate::pages::{home::HomePage, indicators::IndicatorsPage, login::LoginPage, sso::SsoPage};
use crate::query::cache::QueryCache;
use crate::state::session::BrowserSessions;
use crate::state::toast::ToastState;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides configuration, the session store, the query cache and the toast
/// queue to every page, and mounts the global login dialog.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    provide_context(AppConfig::default());
    provide_context(BrowserSessions::browser());
    provide_context(QueryCache::new());
    provide_context(RwSignal::new(ToastState::default()));

    view! {
        <Stylesheet id="leptos" href="/pkg/admin-console.css"/>
        <Title text="Admin Console"/>

        <Router>
            <LoginDialogProvider>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("sso") view=SsoPage/>
                    <Route path=StaticSegment("indicators") view=IndicatorsPage/>
                    <Route path=StaticSegment("") view=HomePage/>
                </Routes>
            </LoginDialogProvider>
            <ToastHost/>
        </Router>
    }
}
