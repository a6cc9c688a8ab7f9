//! Stack of transient notifications in the corner of the viewport.

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::state::toast::DEFAULT_TOAST_DURATION_MS;
use crate::query::cache::{Clock, SystemClock};
use crate::state::toast::{ToastKind, ToastState};

/// Queue a toast and schedule its removal.
pub fn notify(toasts: RwSignal<ToastState>, kind: ToastKind, message: impl Into<String>) {
    let now = SystemClock.now_ms();
    let message = message.into();
    let Some(id) = toasts.try_update(|t| t.push(kind, message, now)) else {
        return;
    };

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_millis(DEFAULT_TOAST_DURATION_MS)).await;
        toasts.update(|t| {
            t.dismiss(id);
        });
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = id;
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    view! {
        <div class="toast-host" aria-live="polite">
            {move || {
                toasts
                    .get()
                    .items
                    .into_iter()
                    .map(|toast| {
                        let id = toast.id;
                        view! {
                            <div class=format!("toast {}", toast.kind.class())>
                                <span class="toast__message">{toast.message}</span>
                                <button
                                    class="toast__close"
                                    title="Dismiss"
                                    on:click=move |_| {
                                        toasts.update(|t| {
                                            t.dismiss(id);
                                        });
                                    }
                                >
                                    "✕"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
