//! UI Components
//!
//! Reusable Leptos components.

mod app_header;
mod delete_confirm_button;
mod form_field;
mod google_button;
mod kanban_column;
mod site_footer;
mod task_calendar;
mod task_card;
mod task_modal;
mod toast_host;

pub use app_header::AppHeader;
pub use delete_confirm_button::DeleteConfirmButton;
pub use form_field::{FieldError, PasswordInput, TextField};
pub use google_button::{AuthMessage, GoogleButton};
pub use kanban_column::KanbanColumn;
pub use site_footer::SiteFooter;
pub use task_calendar::{CreateTaskFn, TaskCalendar};
pub use task_card::TaskCard;
pub use task_modal::TaskModal;
pub use toast_host::ToastHost;
