//! Toast Notifications
//!
//! Bounded queue of transient messages. Query and mutation failures end up
//! here; each toast dismisses itself after the configured timeout.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::error::ApiError;
use crate::store::{use_app_store, AppStateStoreFields, AppStore};

const DEFAULT_CAPACITY: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Visible toasts, oldest first. Pushing past capacity drops the oldest.
#[derive(Clone, Debug, PartialEq)]
pub struct ToastQueue {
    items: Vec<Toast>,
    capacity: usize,
    next_id: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ToastQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::new(), capacity: capacity.max(1), next_id: 0 }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        if self.items.len() >= self.capacity {
            self.items.remove(0);
        }
        self.items.push(Toast { id: self.next_id, kind, message: message.into() });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        before != self.items.len()
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Copyable handle for raising toasts, safe to move into async blocks
#[derive(Clone, Copy)]
pub struct Toaster {
    store: AppStore,
    timeout_ms: u32,
}

impl Toaster {
    pub fn new(store: AppStore, timeout_ms: u32) -> Self {
        Self { store, timeout_ms }
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let Some(id) = self.store.toasts().try_update(|q| q.push(kind, message)) else {
            return;
        };
        let store = self.store;
        let timeout_ms = self.timeout_ms;
        spawn_local(async move {
            TimeoutFuture::new(timeout_ms).await;
            store.toasts().try_update(|q| q.dismiss(id));
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&self, err: &ApiError) {
        self.show(ToastKind::Error, err.user_message());
    }
}

#[component]
pub fn ToastViewport() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="toast-viewport" aria-live="polite">
            <For
                each=move || store.toasts().with(|q| q.items().to_vec())
                key=|toast| toast.id
                let:toast
            >
                <div class=toast.kind.css_class() role="status">
                    <span>{toast.message.clone()}</span>
                    <button
                        type="button"
                        class="toast-close"
                        on:click=move |_| {
                            store.toasts().update(|q| {
                                q.dismiss(toast.id);
                            });
                        }
                    >
                        "×"
                    </button>
                </div>
            </For>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_toast_dropped_at_capacity() {
        let mut queue = ToastQueue::with_capacity(2);
        queue.push(ToastKind::Error, "first");
        queue.push(ToastKind::Error, "second");
        queue.push(ToastKind::Success, "third");
        let messages: Vec<_> = queue.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn dismiss_by_id() {
        let mut queue = ToastQueue::default();
        let a = queue.push(ToastKind::Info, "a");
        let b = queue.push(ToastKind::Info, "b");
        assert!(queue.dismiss(a));
        assert!(!queue.dismiss(a));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.items()[0].id, b);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut queue = ToastQueue::with_capacity(1);
        let a = queue.push(ToastKind::Info, "a");
        let b = queue.push(ToastKind::Info, "b");
        assert_ne!(a, b);
        assert!(!queue.dismiss(a));
    }
}
