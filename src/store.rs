//! Dashboard State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Provided by the
//! dashboard view; columns, counters and the modal subscribe to the fields
//! they read.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::board::TaskBoard;
use crate::models::{Task, TaskStatus};

/// What the task modal is editing
#[derive(Clone, Debug, PartialEq)]
pub enum Editor {
    Create,
    Edit(Task),
}

#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    pub board: TaskBoard,
    /// First load still in flight
    pub loading: bool,
    /// Open task modal, if any
    pub editor: Option<Editor>,
    /// Column shown on narrow screens
    pub active_column: TaskStatus,
    pub narrow: bool,
}

impl DashboardState {
    pub fn new(narrow: bool) -> Self {
        Self {
            loading: true,
            narrow,
            ..Default::default()
        }
    }
}

pub type DashboardStore = Store<DashboardState>;

pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

// No-ops once the dashboard is unmounted and the store disposed.

pub fn store_add_task(store: &DashboardStore, task: Task) {
    store.board().try_update(|b| b.apply_created(task));
}

pub fn store_remove_task(store: &DashboardStore, id: &str) {
    store.board().try_update(|b| b.apply_deleted(id));
}

pub fn store_move_task(store: &DashboardStore, id: &str, status: TaskStatus) -> bool {
    store.board().try_update(|b| b.apply_status(id, status)).unwrap_or(false)
}

/// Merge a fetched list; `since` is the board revision when the fetch began
pub fn store_reconcile(store: &DashboardStore, fetched: Vec<Task>, since: u64) -> bool {
    store.board().try_update(|b| b.reconcile(fetched, since)).unwrap_or(false)
}

pub fn store_revision(store: &DashboardStore) -> Option<u64> {
    store.board().try_with_untracked(|b| b.revision())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_loading_on_todo_column() {
        let state = DashboardState::new(true);
        assert!(state.loading);
        assert!(state.narrow);
        assert_eq!(state.active_column, TaskStatus::Todo);
        assert!(state.editor.is_none());
        assert!(state.board.is_empty());
    }
}
