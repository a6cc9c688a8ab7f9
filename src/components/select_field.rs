//! `<select>` bound to a `{value, label}` option list.

use leptos::prelude::*;

use crate::net::types::ConfigOption;
use crate::util::enrich::option_key;
use crate::util::select::{SelectConfig, filter_options};

/// Single-value select. Option values are compared as text; the empty
/// placeholder entry maps to `None` and is offered only when `clearable`.
#[component]
pub fn SelectField(
    #[prop(into)] options: Signal<Vec<ConfigOption>>,
    #[prop(into)] value: Signal<Option<String>>,
    on_change: Callback<Option<String>>,
    #[prop(optional)] config: SelectConfig,
) -> impl IntoView {
    let search = RwSignal::new(String::new());
    let searchable = config.searchable;
    let clearable = config.clearable;
    let placeholder = config.placeholder;

    let visible = move || {
        let all = options.get();
        let query = search.get();
        filter_options(&all, &query)
            .into_iter()
            .filter_map(|opt| option_key(&opt.value).map(|key| (key, opt.label.clone())))
            .collect::<Vec<_>>()
    };

    view! {
        <div class="select-field">
            <Show when=move || searchable>
                <input
                    class="select-field__search"
                    type="search"
                    placeholder="Filter"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
            </Show>
            <select
                class="select-field__input"
                on:change=move |ev| {
                    let raw = event_target_value(&ev);
                    on_change.run(if raw.is_empty() { None } else { Some(raw) });
                }
                prop:value=move || value.get().unwrap_or_default()
            >
                <option value="" disabled=!clearable>{placeholder.clone()}</option>
                {move || {
                    let selected = value.get();
                    visible()
                        .into_iter()
                        .map(|(key, label)| {
                            let is_selected = selected.as_deref() == Some(key.as_str());
                            view! { <option value=key selected=is_selected>{label}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}
