//! Single-sign-on landing route: `/sso?token=...&userId=...`.
//!
//! SYSTEM CONTEXT
//! ==============
//! An external portal links here with a one-time token. The page trades it for
//! a session once on mount, then continues exactly like a password login.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::config::AppConfig;
use crate::state::login::SsoStatus;
use crate::state::session::BrowserSessions;

#[component]
pub fn SsoPage() -> impl IntoView {
    let sessions = expect_context::<BrowserSessions>();
    let config = expect_context::<AppConfig>();
    let query = use_query_map();
    let navigate = use_navigate();
    let status = RwSignal::new(SsoStatus::Pending);
    let login_path = config.login_path.clone();

    Effect::new(move || {
        let params = query.get_untracked();
        let (Some(token), Some(user_id)) = (params.get("token"), params.get("userId")) else {
            status.set(SsoStatus::MissingParams);
            return;
        };

        #[cfg(feature = "hydrate")]
        {
            use leptos_router::NavigateOptions;

            use crate::net::api::HttpApi;
            use crate::state::login::complete_sso_login;

            let api = HttpApi::new(&config);
            let sessions = sessions.clone();
            let landing = config.landing_path.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let result = complete_sso_login(&api, &sessions, &token, &user_id, &landing, |path| {
                    navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
                })
                .await;
                if let Some(failed) = SsoStatus::after_attempt(&result) {
                    status.set(failed);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&sessions, &config, &navigate, token, user_id);
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                <p class="login-message">{move || status.get().message()}</p>
                <Show when=move || status.get() != SsoStatus::Pending>
                    <a class="login-button" href=login_path.clone()>
                        "Sign in with a password"
                    </a>
                </Show>
            </div>
        </div>
    }
}
