use std::cell::Cell;

use super::*;

#[derive(Default)]
struct FlagControl {
    open: Cell<bool>,
    opens: Cell<usize>,
}

impl DialogControl for FlagControl {
    fn open(&self) {
        self.open.set(true);
        self.opens.set(self.opens.get() + 1);
    }

    fn close(&self) {
        self.open.set(false);
    }
}

#[test]
fn open_before_registration_is_silent_noop() {
    unregister();
    assert!(!is_registered());
    open_login_dialog();
    close_login_dialog();
    assert!(!invoke_if_registered(|_| panic!("must not run")));
}

#[test]
fn open_and_close_after_registration() {
    let control = Rc::new(FlagControl::default());
    register(control.clone());

    open_login_dialog();
    assert!(control.open.get());
    close_login_dialog();
    assert!(!control.open.get());

    unregister();
}

#[test]
fn unregister_restores_noop_behavior() {
    let control = Rc::new(FlagControl::default());
    register(control.clone());
    unregister();

    open_login_dialog();
    assert!(!control.open.get());
    assert_eq!(control.opens.get(), 0);
}

#[test]
fn re_register_replaces_previous_control() {
    let first = Rc::new(FlagControl::default());
    let second = Rc::new(FlagControl::default());
    register(first.clone());
    register(second.clone());

    open_login_dialog();
    assert!(!first.open.get());
    assert!(second.open.get());

    unregister();
}

#[test]
fn control_may_unregister_itself_while_invoked() {
    struct SelfRemoving;
    impl DialogControl for SelfRemoving {
        fn open(&self) {
            unregister();
        }
        fn close(&self) {}
    }

    register(Rc::new(SelfRemoving));
    open_login_dialog();
    assert!(!is_registered());
}

#[test]
fn dialog_state_defaults_closed() {
    assert!(!LoginDialogState::default().is_open);
}

#[test]
fn context_misuse_message_names_hook_and_provider() {
    let err = ContextMisuse { hook: "use_login_dialog", provider: "LoginDialogProvider" };
    assert_eq!(err.to_string(), "use_login_dialog must be used within LoginDialogProvider");
}
