//! Landing page shown after sign-in.

use leptos::prelude::*;

use crate::components::layout::ProtectedLayout;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <ProtectedLayout>
            <section class="home">
                <h1>"Welcome"</h1>
                <p>"Pick a section from the menu to get started."</p>
                <a class="btn" href="/indicators">"Manage indicators"</a>
            </section>
        </ProtectedLayout>
    }
}
