//! Cached server data.
//!
//! SYSTEM CONTEXT
//! ==============
//! `cache` is the keyed store with freshness/retention windows and retry;
//! `menu` and `config` configure it for the navigation tree and the
//! lookup tables used by selects and label enrichment.

pub mod cache;
pub mod config;
pub mod menu;
