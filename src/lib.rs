//! # admin-console
//!
//! Leptos + WASM front end for the indicator administration console.
//!
//! This crate contains the login/session flow, the menu and configuration
//! data cache, toast notifications, and the indicator management pages. Core
//! behavior is written against small store/API traits so it runs natively in
//! tests; the `hydrate` feature wires it to browser storage and `gloo-net`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod query;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// WASM entry point: installs console logging and hydrates the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
