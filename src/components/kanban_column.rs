//! Kanban Column Component
//!
//! One status column. The column element carries its status in
//! `data-status`; drops read that attribute, not the header text.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_dragleave, make_on_dragover, make_on_drop, DndSignals};

use super::{DeleteConfirmButton, TaskCard};
use crate::board::STATUS_ATTR;
use crate::models::{Task, TaskStatus};
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "Por hacer",
        TaskStatus::Doing => "Haciendo",
        TaskStatus::Done => "Hecho",
    }
}

#[component]
pub fn KanbanColumn(
    status: TaskStatus,
    dnd: DndSignals,
    /// Dragged id and the raw `data-status` of the column it was dropped on
    #[prop(into)] on_drop: Callback<(String, Option<String>)>,
    #[prop(into)] on_edit: Callback<Task>,
    #[prop(into)] on_delete: Callback<String>,
    #[prop(into)] on_clear: Callback<TaskStatus>,
) -> impl IntoView {
    let store = use_dashboard_store();
    let tasks = Memo::new(move |_| store.board().with(|b| b.column(status)));
    let count = move || tasks.with(|t| t.len());
    let slug = status.slug();

    let hidden = move || store.narrow().get() && store.active_column().get() != status;

    view! {
        <section
            class=format!("kanban-column column-{}", slug)
            class:drag-over=move || dnd.is_over(slug)
            class:hidden-mobile=hidden
            data-status=slug
            aria-label=column_title(status)
            on:dragover=make_on_dragover(dnd, STATUS_ATTR)
            on:dragleave=make_on_dragleave(dnd)
            on:drop=make_on_drop(dnd, STATUS_ATTR, move |id, zone| on_drop.run((id, zone)))
        >
            <header class="column-header">
                <h2 class="column-title">{column_title(status)}</h2>
                <span class="column-count">{count}</span>
                <Show when=move || count() != 0>
                    <DeleteConfirmButton
                        button_class="clear-column-btn"
                        label="Vaciar"
                        title="Eliminar todas las tareas de la columna"
                        question="¿Eliminar todas?"
                        on_confirm=move |_| on_clear.run(status)
                    />
                </Show>
            </header>
            <div class="task-list">
                <For
                    each=move || tasks.get()
                    key=|task| (task.id.clone(), task.status, task.title.clone(), task.date.clone(), task.time.clone())
                    children=move |task| view! {
                        <TaskCard task=task dnd=dnd on_edit=on_edit on_delete=on_delete />
                    }
                />
                <Show when=move || count() == 0>
                    <p class="column-empty">"Suelta una tarea aquí"</p>
                </Show>
            </div>
        </section>
    }
}
