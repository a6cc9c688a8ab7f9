//! Account + password login page.
//!
//! Visitors who already hold a session are sent on immediately; everyone else
//! submits the form, which stores the session and follows the pending redirect.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::config::AppConfig;
use crate::state::login::LoginForm;
use crate::state::session::BrowserSessions;
use crate::util::redirect::install_session_redirect;

#[component]
pub fn LoginPage() -> impl IntoView {
    let sessions = expect_context::<BrowserSessions>();
    let config = expect_context::<AppConfig>();
    let navigate = use_navigate();
    install_session_redirect(sessions.clone(), config.landing_path.clone(), navigate.clone());

    let form = RwSignal::new(LoginForm::default());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(credentials) = form.try_update(LoginForm::begin_submit).flatten() else {
            return;
        };

        #[cfg(feature = "hydrate")]
        {
            use leptos_router::NavigateOptions;

            use crate::net::api::HttpApi;
            use crate::state::login::complete_login;

            let api = HttpApi::new(&config);
            let sessions = sessions.clone();
            let landing = config.landing_path.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let result = complete_login(&api, &sessions, credentials, &landing, |path| {
                    navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
                })
                .await;
                form.update(|f| f.finish_submit(&result));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = credentials;
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Admin Console"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Account"
                        prop:value=move || form.get().account
                        on:input=move |ev| form.update(|f| f.update_account(event_target_value(&ev)))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || form.get().password
                        on:input=move |ev| form.update(|f| f.update_password(event_target_value(&ev)))
                    />
                    <label class="login-remember">
                        <input
                            type="checkbox"
                            prop:checked=move || form.get().remember
                            on:change=move |ev| form.update(|f| f.update_remember(event_target_checked(&ev)))
                        />
                        "Remember me"
                    </label>
                    <button class="login-button" type="submit" disabled=move || form.get().is_submitting()>
                        {move || if form.get().is_submitting() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || form.get().error.is_some()>
                    <p class="login-message">{move || form.get().error.unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
