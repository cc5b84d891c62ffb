//! Task Modal Component
//!
//! Create/edit form for a task with live validation. On create the status is
//! fixed to "Por hacer".

use leptos::prelude::*;

use super::FieldError;
use crate::models::{TaskDraft, TaskStatus};
use crate::store::Editor;
use crate::validation::{self, TaskFormErrors, DETAIL_MAX, TITLE_MAX};
use crate::views::field_value;

#[component]
pub fn TaskModal(
    #[prop(into)] editor: Signal<Option<Editor>>,
    #[prop(into)] saving: Signal<bool>,
    /// Id of the edited task (`None` on create) and the validated draft
    #[prop(into)] on_submit: Callback<(Option<String>, TaskDraft)>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let detail = RwSignal::new(String::new());
    let date = RwSignal::new(String::new());
    let time = RwSignal::new(String::new());
    let status = RwSignal::new(TaskStatus::Todo.wire().to_string());
    // Errors stay hidden until the user types or tries to submit
    let touched = RwSignal::new(false);

    Effect::new(move |_| {
        let (t, d, day, hour, s) = match editor.get() {
            Some(Editor::Edit(task)) => (
                task.title.clone(),
                task.detail.clone().unwrap_or_default(),
                task.date_key().to_string(),
                task.time.clone().unwrap_or_default(),
                task.status.wire().to_string(),
            ),
            _ => Default::default(),
        };
        title.set(t);
        detail.set(d);
        date.set(day);
        time.set(hour);
        status.set(if s.is_empty() { TaskStatus::Todo.wire().to_string() } else { s });
        touched.set(false);
    });

    let errors = Memo::new(move |_| {
        validation::task_form(&title.get(), &detail.get(), &date.get(), &time.get(), &status.get())
    });
    let visible = move |pick: fn(&TaskFormErrors) -> Option<&'static str>| {
        Signal::derive(move || if touched.get() { errors.with(pick) } else { None })
    };
    let is_create = move || matches!(editor.get(), Some(Editor::Create));

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        touched.set(true);
        if saving.get_untracked() || !errors.with_untracked(TaskFormErrors::is_empty) {
            return;
        }
        let Some(current) = editor.get_untracked() else { return };
        let draft = TaskDraft::new(&title.get_untracked(), &detail.get_untracked(), &date.get_untracked(), &time.get_untracked());
        let id = match current {
            Editor::Create => None,
            Editor::Edit(task) => Some(task.id),
        };
        let draft = match id {
            None => draft,
            Some(_) => draft.with_status(TaskStatus::from_wire(&status.get_untracked()).unwrap_or_default()),
        };
        on_submit.run((id, draft));
    };

    let on_input = move |signal: RwSignal<String>| {
        move |ev: web_sys::Event| {
            signal.set(field_value(&ev));
            touched.set(true);
        }
    };

    view! {
        <Show when=move || editor.get().is_some()>
            <div class="modal-overlay" on:click=move |_| on_close.run(())>
                <div
                    class="modal"
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby="task-modal-title"
                    on:click=|ev| ev.stop_propagation()
                >
                    <header class="modal-header">
                        <h2 id="task-modal-title">{move || if is_create() { "Nueva Tarea" } else { "Editar Tarea" }}</h2>
                        <button type="button" class="modal-close" aria-label="Cerrar" on:click=move |_| on_close.run(())>
                            "×"
                        </button>
                    </header>
                    <form class="task-form" novalidate=true on:submit=submit>
                        <div class="form-group">
                            <label for="task-title">"Título"</label>
                            <input
                                id="task-title"
                                type="text"
                                maxlength=TITLE_MAX.to_string()
                                prop:value=move || title.get()
                                on:input=on_input(title)
                            />
                            <span class="char-count">{move || format!("{}/{}", title.with(|t| t.chars().count()), TITLE_MAX)}</span>
                            <FieldError error=visible(|e| e.title) />
                        </div>
                        <div class="form-group">
                            <label for="task-detail">"Detalle"</label>
                            <textarea
                                id="task-detail"
                                rows="4"
                                prop:value=move || detail.get()
                                on:input=on_input(detail)
                            ></textarea>
                            <span class="char-count">{move || format!("{}/{}", detail.with(|t| t.chars().count()), DETAIL_MAX)}</span>
                            <FieldError error=visible(|e| e.detail) />
                        </div>
                        <div class="form-row">
                            <div class="form-group">
                                <label for="task-date">"Fecha"</label>
                                <input id="task-date" type="date" prop:value=move || date.get() on:input=on_input(date) />
                                <FieldError error=visible(|e| e.date) />
                            </div>
                            <div class="form-group">
                                <label for="task-time">"Hora (opcional)"</label>
                                <input
                                    id="task-time"
                                    type="time"
                                    placeholder="HH:MM"
                                    prop:value=move || time.get()
                                    on:input=on_input(time)
                                />
                                <FieldError error=visible(|e| e.time) />
                            </div>
                        </div>
                        <div class="form-group">
                            <label for="task-status">"Estado"</label>
                            <select
                                id="task-status"
                                prop:value=move || status.get()
                                prop:disabled=is_create
                                on:change=on_input(status)
                            >
                                {TaskStatus::ALL.into_iter().map(|s| view! {
                                    <option value=s.wire()>{s.wire()}</option>
                                }).collect_view()}
                            </select>
                            <FieldError error=visible(|e| e.status) />
                        </div>
                        <p class="form-summary" aria-live="polite">
                            {move || if touched.get() { errors.with(|e| e.summary()) } else { String::new() }}
                        </p>
                        <div class="modal-actions">
                            <button type="button" class="btn-cancel" on:click=move |_| on_close.run(())>
                                "Cancelar"
                            </button>
                            <button
                                type="submit"
                                class="btn-primary"
                                prop:disabled=move || saving.get() || (touched.get() && !errors.with(|e| e.is_empty()))
                            >
                                {move || match (saving.get(), is_create()) {
                                    (true, _) => "Guardando...",
                                    (false, true) => "Crear tarea",
                                    (false, false) => "Guardar cambios",
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
