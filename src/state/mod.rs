//! Client state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plain state types and controllers. Components keep them in `RwSignal`s or
//! read them through context; the logic itself does not depend on a reactive
//! runtime, so it is tested natively.

pub mod dialog;
pub mod indicator;
pub mod login;
pub mod session;
pub mod toast;
