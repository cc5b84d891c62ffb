//! Task Card Component
//!
//! Draggable kanban card with edit and delete actions.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_dragend, make_on_dragstart, DndSignals};

use super::DeleteConfirmButton;
use crate::calendar::card_schedule;
use crate::models::Task;

#[component]
pub fn TaskCard(
    task: Task,
    dnd: DndSignals,
    #[prop(into)] on_edit: Callback<Task>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let id = task.id.clone();
    let drag_id = id.clone();
    let dragging_id = id.clone();
    let delete_id = id.clone();
    let schedule = card_schedule(&task);
    let edit_task = task.clone();

    view! {
        <article
            class="task-card"
            class:dragging=move || dnd.is_dragging(&dragging_id)
            data-id=id
            draggable="true"
            on:dragstart=make_on_dragstart(dnd, drag_id)
            on:dragend=make_on_dragend(dnd)
        >
            <div class="task-title">{task.title.clone()}</div>
            {task.detail.clone().filter(|d| !d.is_empty()).map(|detail| view! {
                <div class="task-description">{detail}</div>
            })}
            <div class="task-meta">
                <div class="task-date">
                    <span class="icon" aria-hidden="true">"📅"</span>
                    {schedule}
                </div>
                <div class="task-status-badge">{task.status.badge()}</div>
            </div>
            <div class="task-actions">
                <button
                    type="button"
                    class="edit-task-btn"
                    title="Editar tarea"
                    aria-label="Editar tarea"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        if !dnd.drag_just_ended_read.get_untracked() {
                            on_edit.run(edit_task.clone());
                        }
                    }
                >
                    "✎"
                </button>
                <DeleteConfirmButton
                    button_class="delete-task-btn"
                    label="🗑"
                    title="Eliminar tarea"
                    question="¿Eliminar tarea?"
                    on_confirm=move |_| on_delete.run(delete_id.clone())
                />
            </div>
        </article>
    }
}
