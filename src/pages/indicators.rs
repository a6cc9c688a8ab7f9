//! Indicator management page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lists indicators from the query cache with client-side search, and edits
//! them in a side drawer. Saves and deletes update the visible list before the
//! server answers; failures roll the list back and surface as toasts.

#[cfg(test)]
#[path = "indicators_test.rs"]
mod indicators_test;

use leptos::prelude::*;

use crate::components::layout::ProtectedLayout;
use crate::components::select_field::SelectField;
use crate::components::toast_host::notify;
use crate::config::AppConfig;
use crate::net::api::HttpApi;
use crate::net::types::{ConfigOption, Indicator};
use crate::query::cache::QueryCache;
use crate::state::indicator::{IndicatorDrawer, begin_delete, begin_save, indicator_list_key};
use crate::state::session::BrowserSessions;
use crate::state::toast::{ToastKind, ToastState};
use crate::util::select::{SelectConfig, SelectOverrides, label_for};

/// Everything an action needs to reach the cache and the API.
#[derive(Clone, Debug)]
struct PageDeps {
    config: AppConfig,
    sessions: BrowserSessions,
    cache: QueryCache,
}

impl PageDeps {
    fn api(&self) -> HttpApi {
        HttpApi::for_session(&self.config, &self.sessions)
    }

    fn cached_list(&self) -> Vec<Indicator> {
        self.cache.get_query_data(&indicator_list_key()).unwrap_or_default()
    }
}

fn matches_search(row: &Indicator, needle: &str) -> bool {
    needle.is_empty() || row.name.to_lowercase().contains(needle) || row.code.to_lowercase().contains(needle)
}

/// Display label for an id column: the enriched name if present, else a
/// lookup in the loaded table, else the raw id.
fn display_label(name: Option<&str>, id: Option<&str>, table: &[ConfigOption]) -> String {
    if let Some(name) = name {
        return name.to_owned();
    }
    let Some(id) = id else {
        return String::new();
    };
    label_for(table, id).unwrap_or(id).to_owned()
}

#[component]
pub fn IndicatorsPage() -> impl IntoView {
    let deps = StoredValue::new(PageDeps {
        config: expect_context::<AppConfig>(),
        sessions: expect_context::<BrowserSessions>(),
        cache: expect_context::<QueryCache>(),
    });
    let toasts = expect_context::<RwSignal<ToastState>>();

    let rows = RwSignal::new(Vec::<Indicator>::new());
    let loading = RwSignal::new(false);
    let categories = RwSignal::new(Vec::<ConfigOption>::new());
    let owners = RwSignal::new(Vec::<ConfigOption>::new());
    let drawer = RwSignal::new(IndicatorDrawer::default());
    let search = RwSignal::new(String::new());

    let refresh_rows = move || rows.set(deps.with_value(PageDeps::cached_list));

    let reload = move || {
        #[cfg(feature = "hydrate")]
        {
            use crate::net::api::IndicatorApi;
            use crate::query::config::load_config_table;
            use crate::state::indicator::{CATEGORY_CONFIG_KEY, USERS_CONFIG_KEY, indicator_list_options};

            let deps = deps.get_value();
            loading.set(true);
            leptos::task::spawn_local(async move {
                let api = deps.api();
                match load_config_table(&deps.cache, &api, CATEGORY_CONFIG_KEY).await {
                    Ok(table) => categories.set(table),
                    Err(e) => log::warn!("category options unavailable: {e}"),
                }
                match load_config_table(&deps.cache, &api, USERS_CONFIG_KEY).await {
                    Ok(table) => owners.set(table),
                    Err(e) => log::warn!("owner options unavailable: {e}"),
                }
                let list = deps
                    .cache
                    .fetch_query(&indicator_list_key(), &indicator_list_options(), || api.list_indicators())
                    .await;
                match list {
                    Ok(list) => rows.set(list),
                    Err(e) => notify(toasts, ToastKind::Error, format!("Could not load indicators: {e}")),
                }
                loading.set(false);
            });
        }
    };
    Effect::new(move || reload());

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let state = drawer.get_untracked();
        if state.saving {
            return;
        }
        let pending = match deps.with_value(|d| begin_save(&d.cache, &state.draft)) {
            Ok(pending) => pending,
            Err(e) => {
                drawer.update(|d| d.error = Some(e.to_string()));
                return;
            }
        };
        refresh_rows();
        drawer.update(|d| {
            d.saving = true;
            d.error = None;
        });

        #[cfg(feature = "hydrate")]
        {
            let deps = deps.get_value();
            leptos::task::spawn_local(async move {
                let result = pending.commit(&deps.cache, &deps.api()).await;
                rows.set(deps.cached_list());
                match result {
                    Ok(saved) => {
                        drawer.update(IndicatorDrawer::close);
                        notify(toasts, ToastKind::Success, format!("Saved {}", saved.name));
                        reload();
                    }
                    Err(e) => {
                        drawer.update(|d| {
                            d.saving = false;
                            d.error = Some(e.to_string());
                        });
                        notify(toasts, ToastKind::Error, format!("Save failed: {e}"));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = pending;
    };

    let on_delete = move |id: String| {
        let pending = deps.with_value(|d| begin_delete(&d.cache, &id));
        refresh_rows();

        #[cfg(feature = "hydrate")]
        {
            let deps = deps.get_value();
            leptos::task::spawn_local(async move {
                match pending.commit(&deps.cache, &deps.api()).await {
                    Ok(()) => notify(toasts, ToastKind::Info, "Indicator deleted"),
                    Err(e) => {
                        rows.set(deps.cached_list());
                        notify(toasts, ToastKind::Error, format!("Delete failed: {e}"));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = pending;
    };

    let visible_rows = move || {
        let needle = search.get().trim().to_lowercase();
        rows.get().into_iter().filter(|row| matches_search(row, &needle)).collect::<Vec<_>>()
    };

    let owner_select = SelectConfig::default().merge(SelectOverrides {
        searchable: Some(true),
        ..SelectOverrides::default()
    });

    view! {
        <ProtectedLayout>
            <section class="indicators">
                <div class="indicators__header">
                    <h1>"Indicators"</h1>
                    <input
                        class="indicators__search"
                        type="search"
                        placeholder="Search by name or code"
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" on:click=move |_| drawer.update(IndicatorDrawer::open_create)>
                        "New indicator"
                    </button>
                </div>

                <Show when=move || loading.get()>
                    <p class="indicators__loading">"Loading..."</p>
                </Show>

                <table class="indicators__table">
                    <thead>
                        <tr>
                            <th>"Code"</th>
                            <th>"Name"</th>
                            <th>"Unit"</th>
                            <th>"Category"</th>
                            <th>"Owner"</th>
                            <th>"Enabled"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let cats = categories.get();
                            let users = owners.get();
                            visible_rows()
                                .into_iter()
                                .map(|row| {
                                    let category = display_label(
                                        row.category_name.as_deref(),
                                        row.category_id.as_deref(),
                                        &cats,
                                    );
                                    let owner = display_label(row.owner_name.as_deref(), row.owner_id.as_deref(), &users);
                                    let edit_row = row.clone();
                                    let delete_id = row.id.clone();
                                    view! {
                                        <tr>
                                            <td>{row.code.clone()}</td>
                                            <td>{row.name.clone()}</td>
                                            <td>{row.unit.clone()}</td>
                                            <td>{category}</td>
                                            <td>{owner}</td>
                                            <td>{if row.enabled { "Yes" } else { "No" }}</td>
                                            <td class="indicators__actions">
                                                <button
                                                    class="btn"
                                                    on:click=move |_| drawer.update(|d| d.open_edit(&edit_row))
                                                >
                                                    "Edit"
                                                </button>
                                                <button
                                                    class="btn btn--danger"
                                                    on:click=move |_| on_delete(delete_id.clone())
                                                >
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>

                <Show when=move || drawer.get().open>
                    <div class="drawer__backdrop" on:click=move |_| drawer.update(IndicatorDrawer::close)></div>
                    <aside class="drawer">
                        <h2>{move || drawer.get().title()}</h2>
                        <form class="drawer__form" on:submit=on_save>
                            <label>
                                "Name"
                                <input
                                    type="text"
                                    prop:value=move || drawer.get().draft.name
                                    on:input=move |ev| drawer.update(|d| d.draft.name = event_target_value(&ev))
                                />
                            </label>
                            <label>
                                "Code"
                                <input
                                    type="text"
                                    prop:value=move || drawer.get().draft.code
                                    on:input=move |ev| drawer.update(|d| d.draft.code = event_target_value(&ev))
                                />
                            </label>
                            <label>
                                "Unit"
                                <input
                                    type="text"
                                    prop:value=move || drawer.get().draft.unit
                                    on:input=move |ev| drawer.update(|d| d.draft.unit = event_target_value(&ev))
                                />
                            </label>
                            <label>
                                "Category"
                                <SelectField
                                    options=categories
                                    value=Signal::derive(move || drawer.get().draft.category_id)
                                    on_change=Callback::new(move |v: Option<String>| drawer.update(|d| d.draft.category_id = v))
                                />
                            </label>
                            <label>
                                "Owner"
                                <SelectField
                                    options=owners
                                    value=Signal::derive(move || drawer.get().draft.owner_id)
                                    on_change=Callback::new(move |v: Option<String>| drawer.update(|d| d.draft.owner_id = v))
                                    config=owner_select.clone()
                                />
                            </label>
                            <label class="drawer__check">
                                <input
                                    type="checkbox"
                                    prop:checked=move || drawer.get().draft.enabled
                                    on:change=move |ev| drawer.update(|d| d.draft.enabled = event_target_checked(&ev))
                                />
                                "Enabled"
                            </label>
                            <label>
                                "Remark"
                                <textarea
                                    prop:value=move || drawer.get().draft.remark
                                    on:input=move |ev| drawer.update(|d| d.draft.remark = event_target_value(&ev))
                                ></textarea>
                            </label>
                            <Show when=move || drawer.get().error.is_some()>
                                <p class="drawer__error">{move || drawer.get().error.unwrap_or_default()}</p>
                            </Show>
                            <div class="drawer__actions">
                                <button type="button" class="btn" on:click=move |_| drawer.update(IndicatorDrawer::close)>
                                    "Cancel"
                                </button>
                                <button type="submit" class="btn btn--primary" disabled=move || drawer.get().saving>
                                    "Save"
                                </button>
                            </div>
                        </form>
                    </aside>
                </Show>
            </section>
        </ProtectedLayout>
    }
}
