//! Toast notification queue.
//!
//! DESIGN
//! ======
//! Plain state held in an `RwSignal` by the app root. Timestamps are passed in
//! by the caller so expiry is deterministic in tests.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

pub const DEFAULT_TOAST_DURATION_MS: u64 = 3_000;
pub const MAX_VISIBLE_TOASTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    /// CSS modifier for the toast container.
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "toast--success",
            Self::Info => "toast--info",
            Self::Warning => "toast--warning",
            Self::Error => "toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl Toast {
    pub fn expires_at_ms(&self) -> u64 {
        self.created_at_ms.saturating_add(self.duration_ms)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ToastState {
    pub items: Vec<Toast>,
    next_id: u64,
}

impl ToastState {
    /// Queue a toast; the oldest is dropped once more than
    /// [`MAX_VISIBLE_TOASTS`] are showing. Returns the new toast's id.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now_ms: u64) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
            created_at_ms: now_ms,
            duration_ms: DEFAULT_TOAST_DURATION_MS,
        });
        if self.items.len() > MAX_VISIBLE_TOASTS {
            let overflow = self.items.len() - MAX_VISIBLE_TOASTS;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn success(&mut self, message: impl Into<String>, now_ms: u64) -> u64 {
        self.push(ToastKind::Success, message, now_ms)
    }

    pub fn info(&mut self, message: impl Into<String>, now_ms: u64) -> u64 {
        self.push(ToastKind::Info, message, now_ms)
    }

    pub fn warning(&mut self, message: impl Into<String>, now_ms: u64) -> u64 {
        self.push(ToastKind::Warning, message, now_ms)
    }

    pub fn error(&mut self, message: impl Into<String>, now_ms: u64) -> u64 {
        self.push(ToastKind::Error, message, now_ms)
    }

    /// Remove a toast by id. Returns whether it was still showing.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    /// Drop every toast whose display time has passed. Returns how many.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.items.len();
        self.items.retain(|t| t.expires_at_ms() > now_ms);
        before - self.items.len()
    }
}
