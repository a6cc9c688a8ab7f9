//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render console chrome and overlays while reading/writing shared
//! state from Leptos context providers.

pub mod layout;
pub mod login_dialog;
pub mod menu_tree;
pub mod select_field;
pub mod toast_host;
pub mod toolbar;
