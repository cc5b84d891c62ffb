//! Delete Confirm Button Component
//!
//! Inline confirmation in front of destructive actions (task delete, column
//! clear, account delete).

use leptos::prelude::*;

/// Shows `label` first; clicking it swaps in a question with confirm/cancel.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] label: String,
    #[prop(into, default = "¿Eliminar?".to_string())] question: String,
    #[prop(into, optional)] title: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    view! {
        <Show
            when=move || confirming.get()
            fallback=move || {
                let button_class = button_class.clone();
                let label = label.clone();
                let title = title.clone();
                view! {
                    <button
                        type="button"
                        class=button_class
                        title=title.clone()
                        aria-label=title
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_confirming.set(true);
                        }
                    >
                        {label}
                    </button>
                }
            }
        >
            <span class="delete-confirm" role="group">
                <span class="delete-confirm-text">{question.clone()}</span>
                <button
                    type="button"
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                        on_confirm.run(());
                    }
                >
                    "Sí"
                </button>
                <button
                    type="button"
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                    }
                >
                    "No"
                </button>
            </span>
        </Show>
    }
}
