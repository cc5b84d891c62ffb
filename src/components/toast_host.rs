//! Toast Host Component
//!
//! Renders the toaster's queue in a fixed `aria-live` region.

use leptos::prelude::*;

use crate::context::use_app;
use crate::toast::{Toast, ToastKind};

fn icon(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "✓",
        ToastKind::Error => "✕",
        ToastKind::Warning => "!",
        ToastKind::Info => "i",
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let toaster = use_app().toaster;
    let id = toast.id;
    let class = if toast.leaving {
        format!("{} toast-leave", toast.kind.class())
    } else {
        format!("{} toast-enter", toast.kind.class())
    };
    let role = if toast.kind == ToastKind::Error { "alert" } else { "status" };

    view! {
        <div class=class role=role>
            <span class="toast-icon" aria-hidden="true">{icon(toast.kind)}</span>
            <span class="toast-message">{toast.message}</span>
            {toast.undo.is_some().then(|| view! {
                <button type="button" class="toast-undo" on:click=move |_| toaster.undo_clicked(id)>
                    "Deshacer"
                </button>
            })}
            <button
                type="button"
                class="toast-close"
                aria-label="Cerrar notificación"
                on:click=move |_| toaster.dismiss(id)
            >
                "×"
            </button>
        </div>
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let queue = use_app().toaster.queue();

    view! {
        <div class="toast-container" aria-live="polite" aria-atomic="false">
            <For
                each=move || queue.with(|q| q.toasts().to_vec())
                key=|toast| (toast.id, toast.leaving)
                children=|toast| view! { <ToastItem toast=toast /> }
            />
        </div>
    }
}
