//! Calendar View
//!
//! Hosts the calendar widget: seeds its task list, persists what it creates
//! and edits selected tasks through the shared task modal.

use std::rc::Rc;

use futures::FutureExt;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{mount_view, ViewHandle};
use crate::board::{self, LoadOutcome, TaskService};
use crate::components::{AppHeader, CreateTaskFn, TaskCalendar, TaskModal};
use crate::context::{use_app, AppContext};
use crate::models::{Task, TaskDraft};
use crate::store::Editor;

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <CalendarPage /> }.into_any())
}

async fn reload(ctx: AppContext, tasks: RwSignal<Vec<Task>>, loading: RwSignal<bool>) {
    match board::load(&ctx.api()).await {
        LoadOutcome::Loaded(list) => {
            log::debug!("[CALENDAR] Loaded {} tasks", list.len());
            tasks.try_set(list);
        }
        LoadOutcome::AuthFailed(_) => ctx.on_auth_failure(),
        LoadOutcome::Failed(_) => {
            ctx.toaster.error("No pudimos obtener tus tareas, inténtalo más tarde");
        }
    }
    loading.try_set(false);
}

#[component]
fn CalendarPage() -> impl IntoView {
    let ctx = use_app();
    let user = RwSignal::new(ctx.session().user());
    let tasks = RwSignal::new(Vec::<Task>::new());
    let loading = RwSignal::new(true);
    let editor = RwSignal::new(None::<Editor>);
    let saving = RwSignal::new(false);

    spawn_local(reload(ctx, tasks, loading));

    let on_task_create: CreateTaskFn = Rc::new(move |draft: TaskDraft| {
        async move {
            let result = ctx.api().create(&draft).await;
            match &result {
                Ok(Some(task)) => log::info!("[CALENDAR] Created task {}", task.id),
                // No record echoed back; fetch the list to show it
                Ok(None) => spawn_local(reload(ctx, tasks, loading)),
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(_) => {}
            }
            result
        }
        .boxed_local()
    });

    let on_task_update = Callback::new(move |task: Task| editor.set(Some(Editor::Edit(task))));

    let on_task_delete = Callback::new(move |id: String| {
        spawn_local(async move {
            match ctx.api().delete(&id).await {
                Ok(()) => {
                    tasks.try_update(|list| list.retain(|t| t.id != id));
                    ctx.toaster.success("Tarea eliminada correctamente");
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[CALENDAR] Delete failed: {}", e);
                    ctx.toaster.error("Error al eliminar la tarea. Inténtalo de nuevo.");
                }
            }
        });
    });

    let on_submit = Callback::new(move |(id, draft): (Option<String>, TaskDraft)| {
        saving.set(true);
        spawn_local(async move {
            let api = ctx.api();
            let result = match id {
                Some(id) => api.update(&id, &draft).await,
                None => api.create(&draft).await.map(|_| ()),
            };
            saving.try_set(false);
            match result {
                Ok(()) => {
                    editor.try_set(None);
                    ctx.toaster.success("Tarea actualizada correctamente");
                    reload(ctx, tasks, loading).await;
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[CALENDAR] Save failed: {}", e);
                    ctx.toaster.error("No pudimos guardar tu tarea, inténtalo de nuevo");
                }
            }
        });
    });

    view! {
        <div class="calendar-page">
            <AppHeader user=user current="calendar" />
            <main class="calendar-main">
                <h1>"Calendario"</h1>
                <Show when=move || loading.get()>
                    <div class="task-spinner" role="status">
                        <span class="spinner" aria-hidden="true"></span>
                        "Cargando tareas..."
                    </div>
                </Show>
                <TaskCalendar
                    tasks=tasks
                    on_task_create=on_task_create
                    on_task_update=on_task_update
                    on_task_delete=on_task_delete
                />
            </main>
            <TaskModal
                editor=editor
                saving=saving
                on_submit=on_submit
                on_close=move |_| editor.set(None)
            />
        </div>
    }
}
