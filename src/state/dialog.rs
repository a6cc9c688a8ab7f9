//! Login dialog state and its process-wide handle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dialog provider component owns the reactive open/close state and hands
//! it to descendants through context. Code outside the component tree (the
//! HTTP client reacting to a 401, for instance) reaches the same dialog through
//! the single-slot registry here, which the provider fills when it mounts.
//!
//! DESIGN
//! ======
//! The registry is thread-local: WASM runs on one thread, and native tests get
//! an isolated slot per test thread. Invoking it while empty does nothing.

#[cfg(test)]
#[path = "dialog_test.rs"]
mod dialog_test;

use std::cell::RefCell;
use std::rc::Rc;

/// Reactive-agnostic view of the login dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoginDialogState {
    pub is_open: bool,
}

/// Something that can open and close the login dialog.
pub trait DialogControl {
    fn open(&self);
    fn close(&self);
}

/// A dialog hook was used outside the provider that supplies it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{hook} must be used within {provider}")]
pub struct ContextMisuse {
    pub hook: &'static str,
    pub provider: &'static str,
}

thread_local! {
    static LOGIN_DIALOG: RefCell<Option<Rc<dyn DialogControl>>> = const { RefCell::new(None) };
}

/// Install `control` as the global login dialog, replacing any previous one.
pub fn register(control: Rc<dyn DialogControl>) {
    LOGIN_DIALOG.with(|slot| *slot.borrow_mut() = Some(control));
}

/// Empty the slot. Safe to call when nothing is registered.
pub fn unregister() {
    LOGIN_DIALOG.with(|slot| slot.borrow_mut().take());
}

pub fn is_registered() -> bool {
    LOGIN_DIALOG.with(|slot| slot.borrow().is_some())
}

/// Run `f` against the registered control. Returns whether one was registered.
pub fn invoke_if_registered(f: impl FnOnce(&dyn DialogControl)) -> bool {
    // Clone out of the slot so `f` may register/unregister re-entrantly.
    let control = LOGIN_DIALOG.with(|slot| slot.borrow().clone());
    match control {
        Some(control) => {
            f(control.as_ref());
            true
        }
        None => false,
    }
}

/// Open the login dialog if its provider is mounted; otherwise do nothing.
pub fn open_login_dialog() {
    if !invoke_if_registered(|control| control.open()) {
        log::debug!("open_login_dialog called before the dialog provider mounted");
    }
}

/// Close the login dialog if its provider is mounted; otherwise do nothing.
pub fn close_login_dialog() {
    invoke_if_registered(|control| control.close());
}
