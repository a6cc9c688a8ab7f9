//! Global re-login dialog and the provider that owns it.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted once at the app root. Descendants reach it via
//! [`use_login_dialog`]; non-component code (the HTTP client on a 401) goes
//! through `state::dialog::open_login_dialog`, which the provider registers
//! itself with on mount and clears on cleanup.

#[cfg(test)]
#[path = "login_dialog_test.rs"]
mod login_dialog_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::state::dialog::{self, ContextMisuse, DialogControl, LoginDialogState};
use crate::state::login::LoginForm;

const HOOK_NAME: &str = "use_login_dialog";
const PROVIDER_NAME: &str = "LoginDialogProvider";

/// Handle to the dialog's reactive state, shared through context.
#[derive(Clone, Copy, Debug)]
pub struct LoginDialogContext {
    pub state: RwSignal<LoginDialogState>,
}

impl LoginDialogContext {
    pub fn is_open(&self) -> bool {
        self.state.get().is_open
    }
}

impl DialogControl for LoginDialogContext {
    fn open(&self) {
        self.state.update(|s| s.is_open = true);
    }

    fn close(&self) {
        self.state.update(|s| s.is_open = false);
    }
}

/// Dialog handle from context.
///
/// # Errors
///
/// Returns [`ContextMisuse`] when called outside [`LoginDialogProvider`].
pub fn try_use_login_dialog() -> Result<LoginDialogContext, ContextMisuse> {
    use_context::<LoginDialogContext>().ok_or(ContextMisuse { hook: HOOK_NAME, provider: PROVIDER_NAME })
}

/// Dialog handle from context.
///
/// # Panics
///
/// Panics when called outside [`LoginDialogProvider`]; that is a wiring bug.
pub fn use_login_dialog() -> LoginDialogContext {
    match try_use_login_dialog() {
        Ok(ctx) => ctx,
        Err(e) => panic!("{e}"),
    }
}

#[component]
pub fn LoginDialogProvider(children: Children) -> impl IntoView {
    let ctx = LoginDialogContext { state: RwSignal::new(LoginDialogState::default()) };
    provide_context(ctx);
    dialog::register(Rc::new(ctx));
    on_cleanup(dialog::unregister);

    view! {
        {children()}
        <Show when=move || ctx.is_open()>
            <LoginDialog ctx=ctx/>
        </Show>
    }
}

/// Modal asking for credentials again after the session expired. A
/// successful login stores the new session and closes the dialog in place.
#[component]
fn LoginDialog(ctx: LoginDialogContext) -> impl IntoView {
    let form = RwSignal::new(LoginForm::default());
    #[cfg(feature = "hydrate")]
    let config = expect_context::<crate::config::AppConfig>();
    #[cfg(feature = "hydrate")]
    let sessions = expect_context::<crate::state::session::BrowserSessions>();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(credentials) = form.try_update(LoginForm::begin_submit).flatten() else {
            return;
        };

        #[cfg(feature = "hydrate")]
        {
            use crate::net::api::HttpApi;
            use crate::state::login::complete_relogin;

            let api = HttpApi::new(&config);
            let sessions = sessions.clone();
            leptos::task::spawn_local(async move {
                let result = complete_relogin(&api, &sessions, &credentials).await;
                form.update(|f| f.finish_submit(&result));
                if result.is_ok() {
                    ctx.close();
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = credentials;
    };

    view! {
        <div class="login-dialog__backdrop">
            <div class="login-dialog" role="dialog" aria-modal="true">
                <div class="login-dialog__header">
                    <h2>"Session expired"</h2>
                    <button class="login-dialog__close" title="Close" on:click=move |_| ctx.close()>
                        "✕"
                    </button>
                </div>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Account"
                        prop:value=move || form.get().account
                        on:input=move |ev| form.update(|f| f.update_account(event_target_value(&ev)))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || form.get().password
                        on:input=move |ev| form.update(|f| f.update_password(event_target_value(&ev)))
                    />
                    <button class="login-button" type="submit" disabled=move || form.get().is_submitting()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || form.get().error.is_some()>
                    <p class="login-message">{move || form.get().error.unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
