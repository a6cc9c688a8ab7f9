use super::*;

#[test]
fn push_assigns_increasing_ids() {
    let mut state = ToastState::default();
    let a = state.success("saved", 0);
    let b = state.error("failed", 0);
    assert!(b > a);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].kind, ToastKind::Error);
}

#[test]
fn overflow_drops_oldest() {
    let mut state = ToastState::default();
    for i in 0..7 {
        state.info(format!("msg {i}"), 0);
    }
    assert_eq!(state.items.len(), MAX_VISIBLE_TOASTS);
    assert_eq!(state.items[0].message, "msg 2");
    assert_eq!(state.items[4].message, "msg 6");
}

#[test]
fn dismiss_removes_only_matching_toast() {
    let mut state = ToastState::default();
    let a = state.warning("a", 0);
    state.warning("b", 0);
    assert!(state.dismiss(a));
    assert!(!state.dismiss(a));
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].message, "b");
}

#[test]
fn expire_uses_duration() {
    let mut state = ToastState::default();
    state.info("early", 1_000);
    state.info("late", 2_500);

    assert_eq!(state.expire(3_999), 0);
    assert_eq!(state.expire(4_000), 1);
    assert_eq!(state.items[0].message, "late");
    assert_eq!(state.expire(10_000), 1);
    assert!(state.items.is_empty());
}

#[test]
fn kind_classes() {
    assert_eq!(ToastKind::Success.class(), "toast--success");
    assert_eq!(ToastKind::Error.class(), "toast--error");
}
