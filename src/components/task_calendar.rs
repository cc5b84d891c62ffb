//! Task Calendar Component
//!
//! Day/week hour grid. The widget keeps its own task list, renders each task
//! in the cell of its hour, and hands every mutation to the host through
//! callbacks.

use std::collections::HashMap;
use std::rc::Rc;

use chrono::NaiveDate;
use futures::future::LocalBoxFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::DeleteConfirmButton;
use crate::calendar::{self, CalendarMode, FIRST_HOUR, LAST_HOUR};
use crate::context::use_app;
use crate::error::ApiError;
use crate::models::{Task, TaskDraft};
use crate::views::field_value;

/// Host-side create: resolves to the stored record, or `None` when the
/// server did not echo one
pub type CreateTaskFn = Rc<dyn Fn(TaskDraft) -> LocalBoxFuture<'static, Result<Option<Task>, ApiError>>>;

type Slots = HashMap<(NaiveDate, u32), Vec<Task>>;

fn group_by_slot(tasks: &[Task]) -> Slots {
    let mut slots: Slots = HashMap::new();
    for task in tasks {
        if let Some(slot) = calendar::slot_for(task) {
            slots.entry(slot).or_default().push(task.clone());
        }
    }
    slots
}

/// Offset inside the hour cell, proportional to the minutes
fn minute_offset(task: &Task) -> Option<String> {
    let minutes: u32 = task.time_of_day()?.split_once(':')?.1.get(..2)?.parse().ok()?;
    (minutes > 0).then(|| format!("margin-top: {}px;", minutes * 20 / 60))
}

#[derive(Clone, Debug, PartialEq)]
struct QuickDraft {
    date: String,
    time: String,
}

#[component]
fn CalendarTask(task: Task, on_open: Callback<Task>) -> impl IntoView {
    let status = calendar::status_class(task.status);
    let style = minute_offset(&task).unwrap_or_default();
    let time = task.time_of_day().and_then(calendar::format_time_12h);
    let clicked = task.clone();

    view! {
        <div
            class=format!("calendar-task {}", status)
            data-task-id=task.id.clone()
            style=style
            on:click=move |ev| {
                ev.stop_propagation();
                on_open.run(clicked.clone());
            }
        >
            <div class="task-content">
                <div class="task-title">{task.title.clone()}</div>
                {time.map(|t| view! { <div class="task-time">{t}</div> })}
                {task.detail.clone().filter(|d| !d.is_empty()).map(|d| view! { <div class="task-detail">{d}</div> })}
            </div>
            <div class=format!("task-status-indicator status-{}", status)></div>
        </div>
    }
}

#[component]
pub fn TaskCalendar(
    /// The widget's task list; the host seeds and refreshes it
    tasks: RwSignal<Vec<Task>>,
    on_task_create: CreateTaskFn,
    #[prop(into)] on_task_update: Callback<Task>,
    #[prop(into)] on_task_delete: Callback<String>,
    #[prop(optional)] start: Option<NaiveDate>,
) -> impl IntoView {
    let toaster = use_app().toaster;
    let today = chrono::Local::now().date_naive();
    let anchor = RwSignal::new(start.unwrap_or(today));
    let mode = RwSignal::new(CalendarMode::default());
    let quick = RwSignal::new(None::<QuickDraft>);
    let confirm = RwSignal::new(None::<Task>);
    let creating = RwSignal::new(false);
    let create_fn = StoredValue::new_local(on_task_create);

    let slots = Memo::new(move |_| tasks.with(|t| group_by_slot(t)));
    let days = Memo::new(move |_| calendar::visible_days(anchor.get(), mode.get()));

    let open_task = Callback::new(move |task: Task| confirm.set(Some(task)));

    let quick_title = RwSignal::new(String::new());
    let quick_detail = RwSignal::new(String::new());
    let quick_date = RwSignal::new(String::new());
    let quick_time = RwSignal::new(String::new());

    let open_quick = move |date: NaiveDate, hour: u32| {
        if quick.get_untracked().is_some() {
            return;
        }
        let draft = QuickDraft { date: date.format("%Y-%m-%d").to_string(), time: calendar::cell_time(hour) };
        quick_title.set(String::new());
        quick_detail.set(String::new());
        quick_date.set(draft.date.clone());
        quick_time.set(draft.time.clone());
        quick.set(Some(draft));
    };

    let submit_quick = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if creating.get_untracked() {
            return;
        }
        let title = quick_title.get_untracked();
        if title.trim().is_empty() {
            toaster.error("El título es requerido");
            return;
        }
        let draft = TaskDraft::new(&title, &quick_detail.get_untracked(), &quick_date.get_untracked(), &quick_time.get_untracked());
        let create = create_fn.get_value();
        creating.set(true);
        spawn_local(async move {
            let result = create(draft).await;
            creating.try_set(false);
            match result {
                Ok(created) => {
                    if let Some(task) = created {
                        tasks.try_update(|list| {
                            list.retain(|t| t.id != task.id);
                            list.push(task);
                        });
                    }
                    toaster.success("Tarea creada exitosamente");
                    quick.try_set(None);
                }
                Err(e) if e.is_auth() => {}
                Err(e) => {
                    log::error!("[CALENDAR] Create failed: {}", e);
                    toaster.error("Error al crear la tarea");
                }
            }
        });
    };

    view! {
        <div class="task-calendar" data-view=move || mode.get().as_str()>
            <div class="calendar-header">
                <div class="calendar-controls">
                    <button
                        type="button"
                        class="calendar-nav-btn"
                        aria-label="Anterior"
                        on:click=move |_| anchor.update(|a| *a = calendar::step(*a, mode.get_untracked(), false))
                    >
                        "‹"
                    </button>
                    <div class="calendar-date-info">
                        <h2 class="calendar-current-date">{move || calendar::title(anchor.get(), mode.get())}</h2>
                        <button type="button" class="btn-today" on:click=move |_| anchor.set(chrono::Local::now().date_naive())>
                            "Hoy"
                        </button>
                    </div>
                    <button
                        type="button"
                        class="calendar-nav-btn"
                        aria-label="Siguiente"
                        on:click=move |_| anchor.update(|a| *a = calendar::step(*a, mode.get_untracked(), true))
                    >
                        "›"
                    </button>
                </div>
                <div class="view-toggle" role="group" aria-label="Vista">
                    <button
                        type="button"
                        class="view-btn"
                        class:active=move || mode.get() == CalendarMode::Day
                        on:click=move |_| mode.set(CalendarMode::Day)
                    >
                        "Día"
                    </button>
                    <button
                        type="button"
                        class="view-btn"
                        class:active=move || mode.get() == CalendarMode::Week
                        on:click=move |_| mode.set(CalendarMode::Week)
                    >
                        "Semana"
                    </button>
                </div>
            </div>

            <div class="calendar-table-container">
                <table class="calendar-table">
                    <thead class="calendar-table-header">
                        <tr class="calendar-header-row">
                            <th class=move || format!("time-header-cell-{}", mode.get().as_str())>"Hora"</th>
                            {move || days.get().into_iter().map(|day| {
                                let is_today = day == today;
                                let name = match mode.get_untracked() {
                                    CalendarMode::Day => String::new(),
                                    CalendarMode::Week => calendar::day_header(day),
                                };
                                view! {
                                    <th class="day-header-cell" class:today=is_today>
                                        <div class="day-name">{name}</div>
                                        <div class="day-number">{chrono::Datelike::day(&day)}</div>
                                    </th>
                                }
                            }).collect_view()}
                        </tr>
                    </thead>
                    <tbody class="calendar-table-body">
                        {(FIRST_HOUR..=LAST_HOUR).map(|hour| view! {
                            <tr class="calendar-hour-row" data-hour=hour.to_string()>
                                <td class=move || format!("time-cell-{}", mode.get().as_str())>
                                    <span class="time-label">{calendar::hour_label(hour)}</span>
                                </td>
                                {move || days.get().into_iter().map(|day| view! {
                                    <td
                                        class="task-cell"
                                        data-date=day.format("%Y-%m-%d").to_string()
                                        data-hour=hour.to_string()
                                        on:click=move |_| open_quick(day, hour)
                                    >
                                        {move || slots.with(|s| s.get(&(day, hour)).cloned().unwrap_or_default())
                                            .into_iter()
                                            .map(|task| view! { <CalendarTask task=task on_open=open_task /> })
                                            .collect_view()}
                                    </td>
                                }).collect_view()}
                            </tr>
                        }).collect_view()}
                    </tbody>
                </table>
            </div>

            <Show when=move || quick.get().is_some()>
                <div class="quick-task-modal" on:click=move |_| quick.set(None)>
                    <div class="quick-task-content" role="dialog" aria-modal="true" on:click=|ev| ev.stop_propagation()>
                        <div class="quick-task-header">
                            <h3>"Nueva Tarea"</h3>
                            <button type="button" class="close-quick-task" aria-label="Cerrar" on:click=move |_| quick.set(None)>
                                "×"
                            </button>
                        </div>
                        <form class="quick-task-form" on:submit=submit_quick>
                            <input
                                type="text"
                                placeholder="Título de la tarea"
                                autofocus=true
                                prop:value=move || quick_title.get()
                                on:input=move |ev| quick_title.set(field_value(&ev))
                            />
                            <textarea
                                placeholder="Descripción (opcional)"
                                prop:value=move || quick_detail.get()
                                on:input=move |ev| quick_detail.set(field_value(&ev))
                            ></textarea>
                            <div class="quick-task-time">
                                <label>"Fecha:"</label>
                                <input type="date" prop:value=move || quick_date.get() on:input=move |ev| quick_date.set(field_value(&ev)) />
                            </div>
                            <div class="quick-task-time">
                                <label>"Hora límite:"</label>
                                <input type="time" prop:value=move || quick_time.get() on:input=move |ev| quick_time.set(field_value(&ev)) />
                            </div>
                            <div class="quick-task-actions">
                                <button type="button" class="btn-cancel" on:click=move |_| quick.set(None)>"Cancelar"</button>
                                <button type="submit" class="btn-create" prop:disabled=move || creating.get()>"Crear Tarea"</button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>

            {move || confirm.get().map(|task| {
                let edit = task.clone();
                let id = task.id.clone();
                view! {
                    <div class="edit-task-modal" on:click=move |_| confirm.set(None)>
                        <div class="edit-task-content" role="dialog" aria-modal="true" on:click=|ev| ev.stop_propagation()>
                            <div class="edit-task-header">
                                <h3>"Editar Tarea"</h3>
                                <button type="button" class="close-edit-task" aria-label="Cerrar" on:click=move |_| confirm.set(None)>
                                    "×"
                                </button>
                            </div>
                            <div class="edit-task-body">
                                <p>"¿Deseas editar la tarea \"" <span class="edit-task-title">{task.title.clone()}</span> "\"?"</p>
                                <div class="edit-task-actions">
                                    <DeleteConfirmButton
                                        button_class="btn-delete"
                                        label="Eliminar"
                                        question="¿Eliminar tarea?"
                                        on_confirm=move |_| {
                                            confirm.set(None);
                                            on_task_delete.run(id.clone());
                                        }
                                    />
                                    <button type="button" class="btn-cancel" on:click=move |_| confirm.set(None)>"Cancelar"</button>
                                    <button
                                        type="button"
                                        class="btn-edit"
                                        on:click=move |_| {
                                            confirm.set(None);
                                            on_task_update.run(edit.clone());
                                        }
                                    >
                                        "Editar"
                                    </button>
                                </div>
                            </div>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::task;
    use crate::models::TaskStatus;

    #[test]
    fn test_tasks_grouped_by_cell() {
        let mut timed = task("a", "2024-06-05", TaskStatus::Todo);
        timed.time = Some("14:45".into());
        let untimed = task("b", "2024-06-05", TaskStatus::Done);
        let slots = group_by_slot(&[timed.clone(), untimed]);
        let day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(slots[&(day, 14)], vec![timed.clone()]);
        assert_eq!(slots[&(day, FIRST_HOUR)].len(), 1);
        assert_eq!(minute_offset(&timed).as_deref(), Some("margin-top: 15px;"));
    }

    #[test]
    fn test_undated_task_has_no_slot() {
        let bad = task("c", "someday", TaskStatus::Todo);
        assert!(group_by_slot(&[bad]).is_empty());
    }
}
