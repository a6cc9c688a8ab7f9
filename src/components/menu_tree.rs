//! Side navigation rendered from the cached menu tree.

use leptos::prelude::*;

use crate::net::types::MenuNode;
use crate::query::menu::flatten_menu;

/// Indented list of menu entries; entries without a path are group headings.
#[component]
pub fn MenuTree(#[prop(into)] nodes: Signal<Vec<MenuNode>>) -> impl IntoView {
    view! {
        <nav class="menu-tree">
            {move || {
                let nodes = nodes.get();
                flatten_menu(&nodes)
                    .into_iter()
                    .map(|(depth, node)| {
                        let indent = format!("padding-left: {}rem", depth + 1);
                        match node.path.clone() {
                            Some(path) => view! {
                                <a class="menu-tree__item" style=indent href=path>
                                    {node.name.clone()}
                                </a>
                            }
                                .into_any(),
                            None => view! {
                                <div class="menu-tree__group" style=indent>
                                    {node.name.clone()}
                                </div>
                            }
                                .into_any(),
                        }
                    })
                    .collect_view()
            }}
        </nav>
    }
}
