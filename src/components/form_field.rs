//! Form Field Components
//!
//! Labelled inputs with an inline error slot, and the password input with its
//! visibility toggle.

use leptos::prelude::*;

use crate::views::field_value;

/// Inline error under a field; renders nothing while `error` is `None`
#[component]
pub fn FieldError(#[prop(into)] error: Signal<Option<&'static str>>) -> impl IntoView {
    move || error.get().map(|message| view! { <span class="field-error" role="alert">{message}</span> })
}

#[component]
pub fn TextField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into, default = "text".to_string())] input_type: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] autocomplete: String,
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<&'static str>>,
) -> impl IntoView {
    view! {
        <div class="form-group" class:has-error=move || error.get().is_some()>
            <label for=id.clone()>{label}</label>
            <input
                id=id
                type=input_type
                placeholder=placeholder
                autocomplete=autocomplete
                aria-invalid=move || if error.get().is_some() { "true" } else { "false" }
                prop:value=move || value.get()
                on:input=move |ev| value.set(field_value(&ev))
            />
            <FieldError error=error />
        </div>
    }
}

/// Password input with a show/hide button
#[component]
pub fn PasswordInput(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, default = "current-password".to_string())] autocomplete: String,
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<&'static str>>,
) -> impl IntoView {
    let (visible, set_visible) = signal(false);

    view! {
        <div class="form-group" class:has-error=move || error.get().is_some()>
            <label for=id.clone()>{label}</label>
            <div class="password-wrapper">
                <input
                    id=id
                    type=move || if visible.get() { "text" } else { "password" }
                    placeholder=placeholder
                    autocomplete=autocomplete
                    aria-invalid=move || if error.get().is_some() { "true" } else { "false" }
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(field_value(&ev))
                />
                <button
                    type="button"
                    class="password-toggle"
                    aria-label=move || if visible.get() { "Ocultar contraseña" } else { "Mostrar contraseña" }
                    aria-pressed=move || if visible.get() { "true" } else { "false" }
                    on:click=move |_| set_visible.update(|v| *v = !*v)
                >
                    {move || if visible.get() { "🙈" } else { "👁" }}
                </button>
            </div>
            <FieldError error=error />
        </div>
    }
}
