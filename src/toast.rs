//! Toast Notifications
//!
//! Bounded queue of transient messages. The queue itself is plain data driven
//! by explicit timestamps; [`Toaster`] wraps it in a signal and owns the timers.

use std::collections::HashMap;
use std::future::Future;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Visible toasts at once; older ones are evicted first
pub const MAX_VISIBLE: usize = 3;
/// Identical message+kind within this window is dropped
pub const DEDUP_WINDOW_MS: f64 = 3_000.0;
/// De-dup entries older than this are forgotten
pub const DEDUP_TTL_MS: f64 = 10_000.0;
/// Leave transition before the entry is removed
pub const LEAVE_MS: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    /// Playing the leave transition
    pub leaving: bool,
    pub undo: Option<Callback<()>>,
}

/// Result of a successful push
#[derive(Debug, PartialEq)]
pub struct Shown {
    pub id: u64,
    /// Toasts pushed out by the cap; already marked as leaving
    pub evicted: Vec<u64>,
}

#[derive(Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    recent: HashMap<(String, ToastKind), f64>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast at `now_ms`; `None` when suppressed as a duplicate
    pub fn push(&mut self, message: &str, kind: ToastKind, undo: Option<Callback<()>>, now_ms: f64) -> Option<Shown> {
        let key = (message.to_string(), kind);
        if let Some(last) = self.recent.get(&key) {
            if now_ms - last < DEDUP_WINDOW_MS {
                log::debug!("[TOAST] Duplicate suppressed: {}", message);
                return None;
            }
        }
        self.recent.insert(key, now_ms);
        self.recent.retain(|_, shown_at| now_ms - *shown_at <= DEDUP_TTL_MS);

        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push(Toast {
            id,
            message: message.to_string(),
            kind,
            leaving: false,
            undo,
        });

        let active: Vec<u64> = self.toasts.iter().filter(|t| !t.leaving).map(|t| t.id).collect();
        let overflow = active.len().saturating_sub(MAX_VISIBLE);
        let evicted: Vec<u64> = active.into_iter().take(overflow).collect();
        for evicted_id in &evicted {
            self.begin_leave(*evicted_id);
        }
        Some(Shown { id, evicted })
    }

    /// Start the leave transition; false if unknown or already leaving
    pub fn begin_leave(&mut self, id: u64) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id && !t.leaving) {
            Some(toast) => {
                toast.leaving = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn take_undo(&mut self, id: u64) -> Option<Callback<()>> {
        self.toasts.iter_mut().find(|t| t.id == id).and_then(|t| t.undo.take())
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn active_count(&self) -> usize {
        self.toasts.iter().filter(|t| !t.leaving).count()
    }
}

/// Toast handle owned by the app context
#[derive(Clone, Copy)]
pub struct Toaster {
    queue: RwSignal<ToastQueue>,
    default_ms: u32,
}

impl Toaster {
    pub fn new(default_ms: u32) -> Self {
        Self { queue: RwSignal::new(ToastQueue::new()), default_ms }
    }

    pub fn queue(&self) -> RwSignal<ToastQueue> {
        self.queue
    }

    /// Show a toast; `duration_ms == 0` keeps it until dismissed
    pub fn show(&self, message: &str, kind: ToastKind, duration_ms: u32, undo: Option<Callback<()>>) -> Option<u64> {
        let now = js_sys::Date::now();
        let shown = self.queue.try_update(|q| q.push(message, kind, undo, now)).flatten()?;
        for id in shown.evicted {
            spawn_local(finish_leave(self.queue, id, TimeoutFuture::new));
        }
        if duration_ms > 0 {
            spawn_local(expire(self.queue, shown.id, duration_ms, TimeoutFuture::new));
        }
        Some(shown.id)
    }

    pub fn dismiss(&self, id: u64) {
        if self.queue.try_update(|q| q.begin_leave(id)) == Some(true) {
            spawn_local(finish_leave(self.queue, id, TimeoutFuture::new));
        }
    }

    /// Run the undo action, then remove the toast
    pub fn undo_clicked(&self, id: u64) {
        if let Some(action) = self.queue.try_update(|q| q.take_undo(id)).flatten() {
            action.run(());
        }
        self.dismiss(id);
    }

    pub fn success(&self, message: &str) -> Option<u64> {
        self.show(message, ToastKind::Success, self.default_ms, None)
    }

    pub fn error(&self, message: &str) -> Option<u64> {
        self.show(message, ToastKind::Error, self.default_ms, None)
    }

    pub fn warning(&self, message: &str) -> Option<u64> {
        self.show(message, ToastKind::Warning, self.default_ms, None)
    }

    pub fn info(&self, message: &str) -> Option<u64> {
        self.show(message, ToastKind::Info, self.default_ms, None)
    }

    /// Warning toast with a "Deshacer" button
    pub fn undo(&self, message: &str, on_undo: Callback<()>) -> Option<u64> {
        self.show(message, ToastKind::Warning, self.default_ms, Some(on_undo))
    }
}

/// Auto-dismiss: wait `after_ms`, start the leave transition, then drop the entry.
/// A toast already leaving is left to whoever started its transition.
async fn expire<S, F>(queue: RwSignal<ToastQueue>, id: u64, after_ms: u32, sleep: S)
where
    S: Fn(u32) -> F,
    F: Future<Output = ()>,
{
    sleep(after_ms).await;
    if queue.try_update(|q| q.begin_leave(id)) == Some(true) {
        finish_leave(queue, id, sleep).await;
    }
}

async fn finish_leave<S, F>(queue: RwSignal<ToastQueue>, id: u64, sleep: S)
where
    S: Fn(u32) -> F,
    F: Future<Output = ()>,
{
    sleep(LEAVE_MS).await;
    queue.try_update(|q| q.remove(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use futures::executor::block_on;
    use futures::future;

    #[test]
    fn test_duplicate_within_window_is_suppressed() {
        let mut queue = ToastQueue::new();
        assert!(queue.push("X", ToastKind::Error, None, 0.0).is_some());
        assert!(queue.push("X", ToastKind::Error, None, 1_000.0).is_none());
        assert!(queue.push("X", ToastKind::Error, None, 3_500.0).is_some());
        assert_eq!(queue.active_count(), 2);
    }

    #[test]
    fn test_same_message_other_kind_is_shown() {
        let mut queue = ToastQueue::new();
        queue.push("X", ToastKind::Error, None, 0.0);
        assert!(queue.push("X", ToastKind::Info, None, 10.0).is_some());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut queue = ToastQueue::new();
        let first = queue.push("a", ToastKind::Info, None, 0.0).unwrap();
        queue.push("b", ToastKind::Info, None, 1.0);
        queue.push("c", ToastKind::Info, None, 2.0);
        let fourth = queue.push("d", ToastKind::Info, None, 3.0).unwrap();
        assert_eq!(fourth.evicted, vec![first.id]);
        assert_eq!(queue.active_count(), MAX_VISIBLE);

        // Leaving toast stays rendered until removed
        assert_eq!(queue.toasts().len(), 4);
        queue.remove(first.id);
        assert_eq!(queue.toasts().len(), 3);
    }

    #[test]
    fn test_begin_leave_only_once() {
        let mut queue = ToastQueue::new();
        let shown = queue.push("a", ToastKind::Success, None, 0.0).unwrap();
        assert!(queue.begin_leave(shown.id));
        assert!(!queue.begin_leave(shown.id));
        assert!(!queue.begin_leave(999));
    }

    #[test]
    fn test_old_dedup_entries_expire() {
        let mut queue = ToastQueue::new();
        queue.push("old", ToastKind::Info, None, 0.0);
        queue.push("new", ToastKind::Info, None, 10_500.0);
        assert_eq!(queue.recent.len(), 1);
    }

    #[test]
    fn test_expiry_leaves_then_removes() {
        let queue = RwSignal::new(ToastQueue::new());
        let id = queue.try_update(|q| q.push("X", ToastKind::Info, None, 0.0)).flatten().unwrap().id;
        let waits = RefCell::new(Vec::new());
        let sleep = |ms: u32| {
            waits.borrow_mut().push(ms);
            future::ready(())
        };

        block_on(expire(queue, id, 5_000, sleep));
        assert_eq!(*waits.borrow(), vec![5_000, LEAVE_MS]);
        assert!(queue.with_untracked(|q| q.toasts().is_empty()));
    }

    #[test]
    fn test_expiry_skips_toast_already_leaving() {
        let queue = RwSignal::new(ToastQueue::new());
        let id = queue.try_update(|q| q.push("Y", ToastKind::Error, None, 0.0)).flatten().unwrap().id;
        queue.update(|q| {
            q.begin_leave(id);
        });
        let waits = RefCell::new(Vec::new());
        let sleep = |ms: u32| {
            waits.borrow_mut().push(ms);
            future::ready(())
        };

        block_on(expire(queue, id, 5_000, sleep));
        assert_eq!(*waits.borrow(), vec![5_000]);
        assert_eq!(queue.with_untracked(|q| q.toasts().len()), 1);
    }
}
