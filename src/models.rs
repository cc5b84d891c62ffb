//! Frontend Models
//!
//! Data structures matching backend entities.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kanban column a task lives in; the wire values are Spanish labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Por hacer")]
    Todo,
    #[serde(rename = "Haciendo")]
    Doing,
    #[serde(rename = "Hecho")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    /// Value stored by the backend
    pub fn wire(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Por hacer",
            TaskStatus::Doing => "Haciendo",
            TaskStatus::Done => "Hecho",
        }
    }

    /// Value of the `data-status` attribute on columns
    pub fn slug(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }

    /// Badge text on task cards
    pub fn badge(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Por hacer",
            TaskStatus::Doing => "En proceso",
            TaskStatus::Done => "Completado",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.wire() == value)
    }
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// `YYYY-MM-DD` part of the date, whether the server sent a date or a timestamp
    pub fn date_key(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_key(), "%Y-%m-%d").ok()
    }

    /// Time of day, treating an empty string as absent
    pub fn time_of_day(&self) -> Option<&str> {
        self.time.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Ascending by date, then by time with untimed tasks first
    pub fn schedule_cmp(&self, other: &Task) -> Ordering {
        self.date_key()
            .cmp(other.date_key())
            .then_with(|| self.time_of_day().cmp(&other.time_of_day()))
    }

    /// Fields compared when deciding whether a refresh changed anything
    pub fn signature(&self) -> (&str, TaskStatus, &str, &str, Option<&str>) {
        (&self.id, self.status, &self.title, self.date_key(), self.time_of_day())
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            detail: self.detail.clone().unwrap_or_default(),
            date: self.date_key().to_string(),
            time: self.time_of_day().map(str::to_string),
            status: self.status,
        }
    }
}

/// Body of task create/update requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub detail: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// New task; always starts in the todo column
    pub fn new(title: &str, detail: &str, date: &str, time: &str) -> Self {
        let time = time.trim();
        Self {
            title: title.trim().to_string(),
            detail: detail.trim().to_string(),
            date: date.to_string(),
            time: (!time.is_empty()).then(|| time.to_string()),
            status: TaskStatus::Todo,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// `GET /tasks` accepts either `{tasks: [...]}` or a bare array.
/// Records are decoded one by one so a single malformed task cannot empty the list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskListResponse {
    Wrapped { tasks: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl TaskListResponse {
    pub fn into_tasks(self) -> Vec<Task> {
        let records = match self {
            TaskListResponse::Wrapped { tasks } | TaskListResponse::Bare(tasks) => tasks,
            TaskListResponse::Other(_) => return Vec::new(),
        };
        records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Task>(record) {
                Ok(task) => Some(task),
                Err(e) => {
                    log::warn!("[API] Skipping unreadable task: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// `POST /tasks` may echo the record bare or under `task`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreatedTask {
    Wrapped { task: Task },
    Bare(Task),
    Other(serde_json::Value),
}

impl CreatedTask {
    /// The created record, if it came back with an id
    pub fn into_task(self) -> Option<Task> {
        match self {
            CreatedTask::Wrapped { task } | CreatedTask::Bare(task) if !task.id.is_empty() => Some(task),
            _ => None,
        }
    }
}

/// User data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Avatar letter
    pub fn initial(&self) -> String {
        self.first_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }

    /// "Miembro desde" text, e.g. `15/03/2024`
    pub fn member_since(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        let date = NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?;
        Some(date.format("%d/%m/%Y").to_string())
    }
}

/// `/users/me` may answer with the user bare or under `user`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserResponse {
    Wrapped { user: User },
    Bare(User),
}

impl UserResponse {
    pub fn into_user(self) -> User {
        match self {
            UserResponse::Wrapped { user } | UserResponse::Bare(user) => user,
        }
    }
}

/// Login answer
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: User,
}

// ========================
// Request Bodies
// ========================

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub email: String,
}

impl ProfileUpdate {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age,
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, date: &str, time: Option<&str>) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            detail: None,
            date: date.to_string(),
            time: time.map(str::to_string),
            status: TaskStatus::Todo,
        }
    }

    #[test]
    fn test_status_wire_labels() {
        let json = serde_json::to_string(&TaskStatus::Doing).unwrap();
        assert_eq!(json, "\"Haciendo\"");
        let parsed: TaskStatus = serde_json::from_str("\"Por hacer\"").unwrap();
        assert_eq!(parsed, TaskStatus::Todo);
        assert_eq!(TaskStatus::from_slug("done"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::from_slug("Hecho"), None);
    }

    #[test]
    fn test_task_accepts_mongo_id_and_timestamp_date() {
        let raw = r#"{"_id":"abc","title":"Buy milk","date":"2024-05-01T00:00:00.000Z","status":"Hecho"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, "abc");
        assert_eq!(t.date_key(), "2024-05-01");
        assert_eq!(t.naive_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(t.status, TaskStatus::Done);
    }

    #[test]
    fn test_schedule_order_puts_untimed_first() {
        let a = task("a", "2024-05-01", Some("09:00"));
        let b = task("b", "2024-05-01", None);
        let c = task("c", "2024-04-30", Some("23:00"));
        let mut list = vec![a, b, c];
        list.sort_by(Task::schedule_cmp);
        let ids: Vec<_> = list.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_draft_omits_empty_time_and_defaults_status() {
        let draft = TaskDraft::new(" Buy milk ", "", "2024-05-01", " ");
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.status, TaskStatus::Todo);
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("time").is_none());
        assert_eq!(json["status"], "Por hacer");
    }

    #[test]
    fn test_task_list_shapes() {
        let wrapped: TaskListResponse =
            serde_json::from_str(r#"{"tasks":[{"_id":"1","title":"t","date":"2024-01-01","status":"Hecho"}]}"#).unwrap();
        assert_eq!(wrapped.into_tasks().len(), 1);
        let bare: TaskListResponse = serde_json::from_str(r#"[]"#).unwrap();
        assert!(bare.into_tasks().is_empty());
        let other: TaskListResponse = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert!(other.into_tasks().is_empty());
    }

    #[test]
    fn test_task_list_skips_unreadable_records() {
        let mixed: TaskListResponse = serde_json::from_str(
            r#"{"tasks":[
                {"_id":"1","title":"t","date":"2024-01-01","status":"Por hacer"},
                {"_id":"2","title":"odd","date":"2024-01-02","status":"Pendiente"},
                {"_id":"3","status":"Hecho"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = mixed.into_tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1".to_string()]);
    }

    #[test]
    fn test_created_task_without_id_is_rejected() {
        let created: CreatedTask = serde_json::from_str(r#"{"title":"t","date":"2024-01-01"}"#).unwrap();
        assert!(created.into_task().is_none());
        let created: CreatedTask =
            serde_json::from_str(r#"{"task":{"_id":"9","title":"t","date":"2024-01-01"}}"#).unwrap();
        assert_eq!(created.into_task().map(|t| t.id), Some("9".to_string()));
    }

    #[test]
    fn test_user_helpers() {
        let user: User = serde_json::from_str(
            r#"{"firstName":"ana","lastName":"Ruiz","email":"a@b.co","createdAt":"2024-03-15T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "ana Ruiz");
        assert_eq!(user.initial(), "A");
        assert_eq!(user.member_since().as_deref(), Some("15/03/2024"));
    }
}
