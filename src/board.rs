//! Kanban Board
//!
//! Task list held by the dashboard: kept sorted by schedule, mutated
//! optimistically, and reconciled against polled server state. Every local
//! mutation bumps a board revision so a poll that started earlier cannot
//! overwrite newer local edits.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;

use crate::commands::{self, RestClient};
use crate::error::ApiError;
use crate::models::{Task, TaskDraft, TaskStatus};

/// Attribute naming the status of a drop column
pub const STATUS_ATTR: &str = "data-status";

/// Backend operations the dashboard needs
#[allow(async_fn_in_trait)]
pub trait TaskService {
    async fn list(&self) -> Result<Vec<Task>, ApiError>;
    async fn create(&self, draft: &TaskDraft) -> Result<Option<Task>, ApiError>;
    async fn update(&self, id: &str, draft: &TaskDraft) -> Result<(), ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

impl TaskService for RestClient {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        commands::list_tasks(self).await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
        commands::create_task(self, draft).await
    }

    async fn update(&self, id: &str, draft: &TaskDraft) -> Result<(), ApiError> {
        commands::update_task(self, id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        commands::delete_task(self, id).await
    }
}

// ========================
// Board State
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    /// Board revision of the last local edit per task id
    edited: HashMap<String, u64>,
    /// Ids deleted locally, with the revision of the deletion
    deleted: HashMap<String, u64>,
    revision: u64,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut board = Self::default();
        board.tasks = tasks;
        board.sort();
        board
    }

    /// Current revision; pass it to [`TaskBoard::reconcile`] for a fetch started now
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.status == status).cloned().collect()
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    pub fn ids_in(&self, status: TaskStatus) -> Vec<String> {
        self.tasks.iter().filter(|t| t.status == status).map(|t| t.id.clone()).collect()
    }

    fn sort(&mut self) {
        self.tasks.sort_by(Task::schedule_cmp);
    }

    fn bump(&mut self, id: &str) -> u64 {
        self.revision += 1;
        self.edited.insert(id.to_string(), self.revision);
        self.revision
    }

    /// Append a task returned by the server
    pub fn apply_created(&mut self, task: Task) {
        self.bump(&task.id);
        self.deleted.remove(&task.id);
        self.tasks.retain(|t| t.id != task.id);
        self.tasks.push(task);
        self.sort();
    }

    pub fn apply_deleted(&mut self, id: &str) {
        let revision = self.bump(id);
        self.deleted.insert(id.to_string(), revision);
        self.tasks.retain(|t| t.id != id);
    }

    /// Move a task to another column; false if the id is unknown
    pub fn apply_status(&mut self, id: &str, status: TaskStatus) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) {
            return false;
        }
        self.bump(id);
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = status;
        }
        true
    }

    /// Merge a server snapshot fetched when the board was at `since`.
    ///
    /// Tasks edited, created or deleted locally after `since` keep their
    /// local state. Returns whether the visible set changed.
    pub fn reconcile(&mut self, fetched: Vec<Task>, since: u64) -> bool {
        let newer = |rev: Option<&u64>| rev.is_some_and(|r| *r > since);

        let mut merged: Vec<Task> = Vec::with_capacity(fetched.len());
        let mut seen = HashSet::new();
        for task in fetched {
            if newer(self.deleted.get(&task.id)) {
                continue;
            }
            seen.insert(task.id.clone());
            let local = self.tasks.iter().find(|t| t.id == task.id);
            match local {
                Some(local) if newer(self.edited.get(&task.id)) => merged.push(local.clone()),
                _ => merged.push(task),
            }
        }
        for local in &self.tasks {
            if !seen.contains(&local.id) && newer(self.edited.get(&local.id)) {
                merged.push(local.clone());
            }
        }
        merged.sort_by(Task::schedule_cmp);

        self.deleted.retain(|_, rev| *rev > since);
        self.edited.retain(|_, rev| *rev > since);

        let changed = !same_task_set(&self.tasks, &merged);
        self.tasks = merged;
        changed
    }
}

/// Same tasks by id, status, title, date and time, regardless of order
pub fn same_task_set(a: &[Task], b: &[Task]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<_> = a.iter().map(Task::signature).collect();
    let mut right: Vec<_> = b.iter().map(Task::signature).collect();
    left.sort();
    right.sort();
    left == right
}

/// Status named by a column's `data-status` value
pub fn parse_status_attr(value: &str) -> Option<TaskStatus> {
    TaskStatus::from_slug(value).or_else(|| TaskStatus::from_wire(value))
}

/// Backend update needed to move a card
#[derive(Debug, Clone, PartialEq)]
pub struct DropPlan {
    pub id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub draft: TaskDraft,
}

/// Plan a drop; `None` when the target is unknown, the task is missing, or
/// the card is already in that column
pub fn plan_drop(board: &TaskBoard, id: &str, status_attr: Option<&str>) -> Option<DropPlan> {
    let to = status_attr.and_then(parse_status_attr)?;
    let task = board.get(id)?;
    if task.status == to {
        return None;
    }
    Some(DropPlan {
        id: task.id.clone(),
        from: task.status,
        to,
        draft: task.draft().with_status(to),
    })
}

// ========================
// Async Flows
// ========================

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<Task>),
    /// Missing token or 401; the session must be dropped
    AuthFailed(ApiError),
    Failed(ApiError),
}

pub async fn load<S: TaskService>(service: &S) -> LoadOutcome {
    match service.list().await {
        Ok(tasks) => LoadOutcome::Loaded(tasks),
        Err(e) if e.is_auth() => LoadOutcome::AuthFailed(e),
        Err(e) => {
            log::error!("[DASHBOARD] Failed to load tasks: {}", e);
            LoadOutcome::Failed(e)
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum CreateOutcome {
    /// Server echoed the record; append it
    Appended(Task),
    /// No usable record came back; reload the list
    NeedsReload,
}

pub async fn submit_new_task<S: TaskService>(service: &S, draft: &TaskDraft) -> Result<CreateOutcome, ApiError> {
    match service.create(draft).await? {
        Some(task) => Ok(CreateOutcome::Appended(task)),
        None => Ok(CreateOutcome::NeedsReload),
    }
}

/// Persist a planned drop. The card moves only after this succeeds.
pub async fn move_task<S: TaskService>(service: &S, plan: &DropPlan) -> Result<(), ApiError> {
    log::debug!("[DASHBOARD] Moving {} from {:?} to {:?}", plan.id, plan.from, plan.to);
    service.update(&plan.id, &plan.draft).await
}

#[derive(Debug, Default, PartialEq)]
pub struct ClearReport {
    pub deleted: Vec<String>,
    pub failed: usize,
}

/// Delete all given ids in parallel; failures are counted, not rolled back
pub async fn clear_column<S: TaskService>(service: &S, ids: Vec<String>) -> ClearReport {
    let results = join_all(ids.iter().map(|id| service.delete(id))).await;
    let mut report = ClearReport::default();
    for (id, result) in ids.into_iter().zip(results) {
        match result {
            Ok(()) => report.deleted.push(id),
            Err(e) => {
                log::warn!("[DASHBOARD] Failed to delete {}: {}", id, e);
                report.failed += 1;
            }
        }
    }
    report
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    use futures::executor::block_on;

    pub(crate) fn task(id: &str, date: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {}", id),
            detail: None,
            date: date.to_string(),
            time: None,
            status,
        }
    }

    /// In-memory backend recording every call
    #[derive(Default)]
    pub(crate) struct FakeTasks {
        pub tasks: RefCell<Vec<Task>>,
        pub calls: RefCell<Vec<String>>,
        pub failing: HashSet<String>,
        pub echo_created: bool,
    }

    impl TaskService for FakeTasks {
        async fn list(&self) -> Result<Vec<Task>, ApiError> {
            self.calls.borrow_mut().push("GET /tasks".into());
            Ok(self.tasks.borrow().clone())
        }

        async fn create(&self, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
            self.calls.borrow_mut().push("POST /tasks".into());
            let task = Task {
                id: format!("new-{}", self.tasks.borrow().len() + 1),
                title: draft.title.clone(),
                detail: Some(draft.detail.clone()),
                date: draft.date.clone(),
                time: draft.time.clone(),
                status: draft.status,
            };
            self.tasks.borrow_mut().push(task.clone());
            Ok(self.echo_created.then_some(task))
        }

        async fn update(&self, id: &str, draft: &TaskDraft) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("PUT /tasks/{}", id));
            if self.failing.contains(id) {
                return Err(ApiError::Status { status: 500, message: "boom".into() });
            }
            if let Some(t) = self.tasks.borrow_mut().iter_mut().find(|t| t.id == id) {
                t.status = draft.status;
            }
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("DELETE /tasks/{}", id));
            if self.failing.contains(id) {
                return Err(ApiError::Status { status: 500, message: "boom".into() });
            }
            self.tasks.borrow_mut().retain(|t| t.id != id);
            Ok(())
        }
    }

    #[test]
    fn test_board_is_sorted_by_date() {
        let board = TaskBoard::with_tasks(vec![
            task("b", "2024-06-02", TaskStatus::Todo),
            task("a", "2024-06-01", TaskStatus::Done),
            task("c", "2024-05-30", TaskStatus::Doing),
        ]);
        let dates: Vec<_> = board.tasks().iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-05-30", "2024-06-01", "2024-06-02"]);
    }

    #[test]
    fn test_create_buy_milk_is_appended_without_reload() {
        let service = FakeTasks { echo_created: true, ..Default::default() };
        let mut board = TaskBoard::new();
        let draft = TaskDraft::new("Buy milk", "", "2024-05-01", "");

        let outcome = block_on(submit_new_task(&service, &draft)).unwrap();
        let CreateOutcome::Appended(created) = outcome else {
            panic!("expected appended task");
        };
        board.apply_created(created);

        assert_eq!(board.len(), 1);
        assert_eq!(board.tasks()[0].status, TaskStatus::Todo);
        assert_eq!(board.tasks()[0].title, "Buy milk");
        assert_eq!(*service.calls.borrow(), vec!["POST /tasks".to_string()]);
    }

    #[test]
    fn test_create_without_echo_requests_reload() {
        let service = FakeTasks::default();
        let draft = TaskDraft::new("Buy milk", "", "2024-05-01", "");
        assert_eq!(block_on(submit_new_task(&service, &draft)), Ok(CreateOutcome::NeedsReload));
    }

    #[test]
    fn test_drop_on_unknown_column_does_nothing() {
        let service = FakeTasks::default();
        let board = TaskBoard::with_tasks(vec![task("1", "2024-05-01", TaskStatus::Todo)]);

        assert_eq!(plan_drop(&board, "1", Some("Pendiente")), None);
        assert_eq!(plan_drop(&board, "1", None), None);
        assert_eq!(plan_drop(&board, "1", Some("todo")), None);
        assert!(service.calls.borrow().is_empty());
        assert_eq!(board.tasks()[0].status, TaskStatus::Todo);
    }

    #[test]
    fn test_failed_move_keeps_card() {
        let service = FakeTasks {
            failing: HashSet::from(["1".to_string()]),
            ..Default::default()
        };
        let mut board = TaskBoard::with_tasks(vec![task("1", "2024-05-01", TaskStatus::Todo)]);
        let plan = plan_drop(&board, "1", Some("done")).unwrap();
        assert_eq!(plan.draft.status, TaskStatus::Done);

        if block_on(move_task(&service, &plan)).is_ok() {
            board.apply_status(&plan.id, plan.to);
        }
        assert_eq!(board.tasks()[0].status, TaskStatus::Todo);
        assert_eq!(*service.calls.borrow(), vec!["PUT /tasks/1".to_string()]);
    }

    #[test]
    fn test_clear_column_reports_partial_failure() {
        let service = FakeTasks {
            failing: HashSet::from(["2".to_string()]),
            ..Default::default()
        };
        let mut board = TaskBoard::with_tasks(vec![
            task("1", "2024-05-01", TaskStatus::Done),
            task("2", "2024-05-02", TaskStatus::Done),
            task("3", "2024-05-03", TaskStatus::Todo),
        ]);
        let report = block_on(clear_column(&service, board.ids_in(TaskStatus::Done)));
        assert_eq!(report.deleted, vec!["1".to_string()]);
        assert_eq!(report.failed, 1);
        for id in &report.deleted {
            board.apply_deleted(id);
        }
        assert_eq!(board.count(TaskStatus::Done), 1);
        assert_eq!(board.count(TaskStatus::Todo), 1);
    }

    #[test]
    fn test_reconcile_detects_changes() {
        let mut board = TaskBoard::with_tasks(vec![task("1", "2024-05-01", TaskStatus::Todo)]);
        let since = board.revision();
        assert!(!board.reconcile(vec![task("1", "2024-05-01", TaskStatus::Todo)], since));
        assert!(board.reconcile(vec![task("1", "2024-05-01", TaskStatus::Doing)], since));
        assert_eq!(board.tasks()[0].status, TaskStatus::Doing);
    }

    #[test]
    fn test_poll_with_one_unreadable_task_keeps_the_rest() {
        use crate::models::TaskListResponse;

        let mut board = TaskBoard::with_tasks(vec![task("1", "2024-05-01", TaskStatus::Todo)]);
        let since = board.revision();
        let polled: TaskListResponse = serde_json::from_str(
            r#"{"tasks":[
                {"_id":"1","title":"task 1","date":"2024-05-01","status":"Por hacer"},
                {"_id":"2","title":"odd","date":"2024-05-02","status":"Pendiente"}
            ]}"#,
        )
        .unwrap();

        assert!(!board.reconcile(polled.into_tasks(), since));
        assert_eq!(board.len(), 1);
        assert_eq!(board.tasks()[0].id, "1");
    }

    #[test]
    fn test_stale_poll_cannot_undo_local_edits() {
        let mut board = TaskBoard::with_tasks(vec![
            task("1", "2024-05-01", TaskStatus::Todo),
            task("2", "2024-05-02", TaskStatus::Todo),
        ]);
        let since = board.revision();
        let stale = board.tasks().to_vec();

        // Local edits land while the poll is in flight
        board.apply_status("1", TaskStatus::Done);
        board.apply_deleted("2");
        board.apply_created(task("3", "2024-05-03", TaskStatus::Todo));

        board.reconcile(stale, since);
        let ids: Vec<_> = board.tasks().iter().map(|t| (t.id.as_str(), t.status)).collect();
        assert_eq!(ids, vec![("1", TaskStatus::Done), ("3", TaskStatus::Todo)]);

        // A poll started after the edits is authoritative again
        let since = board.revision();
        board.reconcile(vec![task("1", "2024-05-01", TaskStatus::Doing)], since);
        assert_eq!(board.len(), 1);
        assert_eq!(board.tasks()[0].status, TaskStatus::Doing);
    }

    #[test]
    fn test_load_separates_auth_failures() {
        struct Unauthorized;
        impl TaskService for Unauthorized {
            async fn list(&self) -> Result<Vec<Task>, ApiError> {
                Err(ApiError::Status { status: 401, message: "expired".into() })
            }
            async fn create(&self, _: &TaskDraft) -> Result<Option<Task>, ApiError> {
                Err(ApiError::AuthRequired)
            }
            async fn update(&self, _: &str, _: &TaskDraft) -> Result<(), ApiError> {
                Err(ApiError::AuthRequired)
            }
            async fn delete(&self, _: &str) -> Result<(), ApiError> {
                Err(ApiError::AuthRequired)
            }
        }
        assert!(matches!(block_on(load(&Unauthorized)), LoadOutcome::AuthFailed(_)));

        let service = FakeTasks::default();
        service.tasks.borrow_mut().push(task("1", "2024-05-01", TaskStatus::Todo));
        assert_eq!(
            block_on(load(&service)),
            LoadOutcome::Loaded(vec![task("1", "2024-05-01", TaskStatus::Todo)])
        );
    }
}
