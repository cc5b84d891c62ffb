//! Dashboard View
//!
//! Kanban board of the user's tasks: three status columns, drag-and-drop
//! between them, a create/edit modal, bulk column clearing and a periodic
//! refresh that only re-renders when the server state changed.

use gloo_timers::callback::{Interval, Timeout};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::create_dnd_signals;
use reactive_stores::Store;

use super::{mount_view, ViewHandle};
use crate::board::{self, CreateOutcome, LoadOutcome, TaskService};
use crate::components::{AppHeader, KanbanColumn, TaskModal};
use crate::context::{use_app, AppContext};
use crate::models::{Task, TaskDraft, TaskStatus};
use crate::store::{
    store_add_task, store_move_task, store_reconcile, store_remove_task, store_revision, DashboardState,
    DashboardStateStoreFields, DashboardStore, Editor,
};

const NARROW_MAX_PX: f64 = 768.0;
const RESIZE_DEBOUNCE_MS: u32 = 100;

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <DashboardPage /> }.into_any())
}

fn is_narrow() -> bool {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|width| width.as_f64())
        .is_some_and(|width| width <= NARROW_MAX_PX)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Refresh {
    Initial,
    /// Timer tick; announces changes, stays quiet on failure
    Poll,
    /// After a mutation that needs the server's view of the list
    Reload,
}

async fn refresh(ctx: AppContext, store: DashboardStore, reason: Refresh) {
    let Some(since) = store_revision(&store) else { return };
    match board::load(&ctx.api()).await {
        LoadOutcome::Loaded(tasks) => {
            log::debug!("[DASHBOARD] Fetched {} tasks ({:?})", tasks.len(), reason);
            let changed = store_reconcile(&store, tasks, since);
            if changed && reason == Refresh::Poll {
                log::info!("[DASHBOARD] Server tasks changed, board updated");
                ctx.toaster.info("Tareas actualizadas");
            }
        }
        LoadOutcome::AuthFailed(_) => ctx.on_auth_failure(),
        LoadOutcome::Failed(_) if reason == Refresh::Poll => {}
        LoadOutcome::Failed(_) => {
            ctx.toaster.error("No pudimos obtener tus tareas, inténtalo más tarde");
        }
    }
    store.loading().try_set(false);
}

fn column_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "Por hacer",
        TaskStatus::Doing => "Haciendo",
        TaskStatus::Done => "Hecho",
    }
}

#[component]
fn ColumnTabs() -> impl IntoView {
    let store = crate::store::use_dashboard_store();

    view! {
        <div class="column-tabs" role="tablist" aria-label="Columnas">
            {TaskStatus::ALL.into_iter().map(|status| {
                let selected = move || store.active_column().get() == status;
                view! {
                    <button
                        type="button"
                        role="tab"
                        class="column-tab"
                        class:active=selected
                        aria-selected=move || if selected() { "true" } else { "false" }
                        on:click=move |_| store.active_column().set(status)
                    >
                        {column_label(status)}
                        <span class="tab-count">{move || store.board().with(|b| b.count(status))}</span>
                    </button>
                }
            }).collect_view()}
        </div>
    }
}

#[component]
fn DashboardPage() -> impl IntoView {
    let ctx = use_app();
    let toaster = ctx.toaster;
    let store = Store::new(DashboardState::new(is_narrow()));
    provide_context(store);

    let user = RwSignal::new(ctx.session().user());
    let saving = RwSignal::new(false);
    let dnd = create_dnd_signals();

    spawn_local(refresh(ctx, store, Refresh::Initial));

    let poll_ms = ctx.config().poll_interval_ms;
    let poll = StoredValue::new_local(Some(Interval::new(poll_ms, move || {
        spawn_local(refresh(ctx, store, Refresh::Poll));
    })));
    on_cleanup(move || {
        log::debug!("[DASHBOARD] Stopping refresh timer");
        poll.try_update_value(|p| p.take());
    });

    let debounce = StoredValue::new_local(None::<Timeout>);
    let resize = window_event_listener(ev::resize, move |_| {
        // Replacing the pending timeout cancels it
        debounce.try_set_value(Some(Timeout::new(RESIZE_DEBOUNCE_MS, move || {
            store.narrow().try_set(is_narrow());
        })));
    });
    on_cleanup(move || resize.remove());

    let on_drop = Callback::new(move |(id, zone): (String, Option<String>)| {
        let plan = store.board().with_untracked(|b| board::plan_drop(b, &id, zone.as_deref()));
        let Some(plan) = plan else {
            log::debug!("[DASHBOARD] Ignoring drop of {} on {:?}", id, zone);
            return;
        };
        spawn_local(async move {
            match board::move_task(&ctx.api(), &plan).await {
                Ok(()) => {
                    store_move_task(&store, &plan.id, plan.to);
                    toaster.success(&format!("Tarea movida a \"{}\"", plan.to.badge()));
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[DASHBOARD] Move failed: {}", e);
                    toaster.error("No se pudo mover la tarea");
                }
            }
        });
    });

    let on_submit = Callback::new(move |(id, draft): (Option<String>, TaskDraft)| {
        saving.set(true);
        spawn_local(async move {
            let api = ctx.api();
            let creating = id.is_none();
            // Ok(true) when the list has to be fetched again
            let result = match id {
                None => board::submit_new_task(&api, &draft).await.map(|outcome| match outcome {
                    CreateOutcome::Appended(task) => {
                        store_add_task(&store, task);
                        false
                    }
                    CreateOutcome::NeedsReload => true,
                }),
                Some(id) => api.update(&id, &draft).await.map(|()| true),
            };
            saving.try_set(false);
            match result {
                Ok(reload) => {
                    store.editor().try_set(None);
                    toaster.success(if creating { "Tarea creada correctamente" } else { "Tarea actualizada correctamente" });
                    if reload {
                        refresh(ctx, store, Refresh::Reload).await;
                    }
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[DASHBOARD] Save failed: {}", e);
                    toaster.error("No pudimos guardar tu tarea, inténtalo de nuevo");
                }
            }
        });
    });

    let on_edit = Callback::new(move |task: Task| store.editor().set(Some(Editor::Edit(task))));

    let on_delete = Callback::new(move |id: String| {
        spawn_local(async move {
            let result = ctx.api().delete(&id).await;
            match result {
                Ok(()) => {
                    store_remove_task(&store, &id);
                    toaster.success("Tarea eliminada correctamente");
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[DASHBOARD] Delete failed: {}", e);
                    toaster.error("Error al eliminar la tarea. Inténtalo de nuevo.");
                    refresh(ctx, store, Refresh::Reload).await;
                }
            }
        });
    });

    let on_clear = Callback::new(move |status: TaskStatus| {
        let ids = store.board().with_untracked(|b| b.ids_in(status));
        if ids.is_empty() {
            return;
        }
        spawn_local(async move {
            let report = board::clear_column(&ctx.api(), ids).await;
            for id in &report.deleted {
                store_remove_task(&store, id);
            }
            if report.failed == 0 {
                toaster.success(&format!("Se eliminaron {} tareas", report.deleted.len()));
            } else {
                toaster.warning(&format!("{} tareas no se pudieron eliminar", report.failed));
            }
        });
    });

    let open_create = move |_| store.editor().set(Some(Editor::Create));
    let total = move || store.board().with(|b| b.len());
    let loading = move || store.loading().get();

    view! {
        <div class="dashboard">
            <AppHeader user=user current="dashboard" />
            <main class="dashboard-main">
                <div class="tasks-title-section">
                    <div>
                        <h1>"Mis tareas"</h1>
                        <p class="task-counter">{move || format!("{} tareas creadas", total())}</p>
                    </div>
                    <Show when=move || total() != 0>
                        <button type="button" class="btn-primary add-task-btn" on:click=open_create>
                            "+ Nueva tarea"
                        </button>
                    </Show>
                </div>

                <Show when=loading>
                    <div class="task-spinner" role="status">
                        <span class="spinner" aria-hidden="true"></span>
                        "Cargando tareas..."
                    </div>
                </Show>

                <Show when=move || !loading() && total() == 0>
                    <div class="empty-state">
                        <div class="empty-illustration" aria-hidden="true">"📋"</div>
                        <h2>"Aún no tienes tareas"</h2>
                        <p>"Organiza tu día creando tu primera tarea."</p>
                        <button type="button" class="btn-primary" on:click=open_create>
                            "Crear primera tarea"
                        </button>
                    </div>
                </Show>

                <Show when=move || !loading() && total() != 0>
                    <Show when=move || store.narrow().get()>
                        <ColumnTabs />
                    </Show>
                    <div class="kanban-board" class:narrow=move || store.narrow().get()>
                        {TaskStatus::ALL.into_iter().map(|status| view! {
                            <KanbanColumn
                                status=status
                                dnd=dnd
                                on_drop=on_drop
                                on_edit=on_edit
                                on_delete=on_delete
                                on_clear=on_clear
                            />
                        }).collect_view()}
                    </div>
                </Show>
            </main>

            <TaskModal
                editor=Signal::derive(move || store.editor().get())
                saving=saving
                on_submit=on_submit
                on_close=move |_| store.editor().set(None)
            />
        </div>
    }
}
