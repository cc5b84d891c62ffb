//! Password Recovery View

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{mount_view, ViewHandle, MIN_SUBMIT_MS};
use crate::commands;
use crate::components::TextField;
use crate::context::{use_app, AppContext};
use crate::error::ApiError;
use crate::validation;

const SPAM_HINT_DELAY_MS: u32 = 2_000;

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <RecoveryPage /> }.into_any())
}

fn recovery_failure(err: &ApiError) -> &'static str {
    if err.is_server() {
        "Error del servidor. Por favor, inténtalo más tarde"
    } else {
        "Error de conexión. Por favor, verifica tu conexión e inténtalo nuevamente"
    }
}

#[component]
fn RecoveryPage() -> impl IntoView {
    let ctx = use_app();
    let email = RwSignal::new(String::new());
    let email_error = RwSignal::new(None::<&'static str>);
    let busy = RwSignal::new(false);
    // Held so leaving the page drops the pending hint
    let hint = StoredValue::new_local(None::<Timeout>);

    Effect::new(move |_| {
        email.track();
        email_error.set(None);
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let address = email.get_untracked().trim().to_string();
        if let Err(message) = validation::recovery_email(&address) {
            email_error.set(Some(message));
            return;
        }

        busy.set(true);
        spawn_local(async move {
            let started = js_sys::Date::now();
            let result = commands::forgot_password(&ctx.api(), &address).await;
            let elapsed = (js_sys::Date::now() - started) as u32;
            TimeoutFuture::new(MIN_SUBMIT_MS.saturating_sub(elapsed)).await;
            busy.try_set(false);

            match result {
                Ok(()) => {
                    log::info!("[AUTH] Recovery email requested");
                    ctx.toaster.success("¡Correo de recuperación enviado! Revisa tu bandeja de entrada.");
                    email.try_set(String::new());
                    hint.try_set_value(Some(Timeout::new(SPAM_HINT_DELAY_MS, move || {
                        ctx.toaster.info(
                            "Si no encuentras el correo, revisa tu carpeta de spam. El enlace expirará en 1 hora.",
                        );
                    })));
                }
                Err(e) => {
                    log::warn!("[AUTH] Recovery request failed: {}", e);
                    ctx.toaster.error(recovery_failure(&e));
                }
            }
        });
    };

    view! {
        <section class="auth-card">
            <h1>"Recuperar contraseña"</h1>
            <p class="auth-subtitle">
                "Ingresa tu correo y te enviaremos un enlace para restablecer tu contraseña."
            </p>
            <form class="auth-form" novalidate=true on:submit=submit>
                <TextField
                    id="email"
                    label="Correo electrónico"
                    input_type="email"
                    placeholder="tu@correo.com"
                    autocomplete="email"
                    value=email
                    error=email_error
                />
                <button type="submit" class="btn-primary auth-submit" prop:disabled=move || busy.get()>
                    <Show when=move || busy.get()>
                        <span class="spinner" aria-hidden="true"></span>
                    </Show>
                    {move || if busy.get() { "Enviando..." } else { "Enviar enlace de recuperación" }}
                </button>
            </form>
            <p class="auth-switch">
                <a
                    href="/login"
                    class="auth-link"
                    on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate("login");
                    }
                >
                    "← Volver a iniciar sesión"
                </a>
            </p>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_failure_messages() {
        let server = ApiError::Status { status: 500, message: "boom".into() };
        assert!(recovery_failure(&server).starts_with("Error del servidor"));
        assert!(recovery_failure(&ApiError::Network("offline".into())).starts_with("Error de conexión"));
    }
}
