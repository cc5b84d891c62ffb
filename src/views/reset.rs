//! Password Reset View
//!
//! Reached from the recovery email link (`/reset?token=...`).

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{location_search, mount_view, ViewHandle, MIN_SUBMIT_MS};
use crate::commands;
use crate::components::PasswordInput;
use crate::context::{use_app, AppContext};
use crate::error::ApiError;
use crate::router::routes::query_param;
use crate::validation;

const MISSING_TOKEN: &str =
    "Token de restablecimiento inválido o faltante. Por favor solicita un nuevo enlace de recuperación.";
const EXPIRED_TOKEN: &str =
    "Tu enlace de restablecimiento ha expirado o es inválido. Por favor solicita uno nuevo.";

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <ResetPage /> }.into_any())
}

#[derive(Debug, PartialEq)]
pub enum ResetFailure {
    /// The link can't be used again; show the panel pointing to recovery
    BadToken,
    Toast(&'static str),
}

pub fn reset_failure(err: &ApiError) -> ResetFailure {
    if let ApiError::Status { status, message } = err {
        let message = message.to_lowercase();
        if matches!(status, 400 | 401) || message.contains("expired") || message.contains("invalid") {
            return ResetFailure::BadToken;
        }
    }
    if err.is_server() {
        ResetFailure::Toast("Error del servidor. Por favor intenta más tarde.")
    } else {
        ResetFailure::Toast("Error de conexión. Por favor verifica tu conexión e intenta nuevamente.")
    }
}

#[component]
fn TokenErrorPanel(message: &'static str) -> impl IntoView {
    let ctx = use_app();
    let to_recovery = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        ctx.navigate("recovery");
    };

    view! {
        <div class="alert alert-error" role="alert">
            <h3>"Token inválido"</h3>
            <p>{message}</p>
            <p>
                "Puedes ir a la "
                <a href="/recovery" on:click=to_recovery>"página de recuperación"</a>
                " para solicitar un nuevo enlace."
            </p>
            <button type="button" class="btn-primary" on:click=to_recovery>"Ir a recuperación"</button>
        </div>
    }
}

#[component]
fn ResetPage() -> impl IntoView {
    let ctx = use_app();
    let token = query_param(&location_search(), "token");

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let password_error = RwSignal::new(None::<&'static str>);
    let confirm_error = RwSignal::new(None::<&'static str>);
    let busy = RwSignal::new(false);
    let token_error = RwSignal::new(None::<&'static str>);

    if token.is_none() {
        log::warn!("[AUTH] Reset page opened without a token");
        token_error.set(Some(MISSING_TOKEN));
        ctx.toaster.error(MISSING_TOKEN);
    }

    Effect::new(move |_| {
        password.track();
        password_error.set(None);
        confirm_error.set(None);
    });
    Effect::new(move |_| {
        confirm.track();
        confirm_error.set(None);
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = token.clone() else { return };
        if busy.get_untracked() {
            return;
        }
        let secret = password.get_untracked();
        password_error.set(validation::strong_password(&secret).err());
        confirm_error.set(validation::confirm_password(&secret, &confirm.get_untracked()).err());
        if password_error.get_untracked().is_some() || confirm_error.get_untracked().is_some() {
            return;
        }

        busy.set(true);
        spawn_local(async move {
            let started = js_sys::Date::now();
            let result = commands::reset_password(&ctx.api(), &token, &secret).await;
            let elapsed = (js_sys::Date::now() - started) as u32;
            TimeoutFuture::new(MIN_SUBMIT_MS.saturating_sub(elapsed)).await;
            busy.try_set(false);

            match result {
                Ok(()) => {
                    log::info!("[AUTH] Password reset");
                    ctx.toaster.success("¡Contraseña restablecida exitosamente!");
                    password.try_set(String::new());
                    confirm.try_set(String::new());
                    TimeoutFuture::new(1_000).await;
                    ctx.toaster.info("Redirigiendo al inicio de sesión...");
                    TimeoutFuture::new(1_500).await;
                    ctx.navigate("login");
                }
                Err(e) => {
                    log::warn!("[AUTH] Password reset failed: {}", e);
                    match reset_failure(&e) {
                        ResetFailure::BadToken => {
                            token_error.try_set(Some(EXPIRED_TOKEN));
                            ctx.toaster.error(EXPIRED_TOKEN);
                        }
                        ResetFailure::Toast(message) => {
                            ctx.toaster.error(message);
                        }
                    }
                }
            }
        });
    };

    view! {
        <section class="auth-card">
            <h1>"Restablecer contraseña"</h1>
            <Show
                when=move || token_error.get().is_none()
                fallback=move || {
                    token_error.get().map(|message| view! { <TokenErrorPanel message=message /> })
                }
            >
                <p class="auth-subtitle">"Elige una nueva contraseña para tu cuenta."</p>
                <form class="auth-form" novalidate=true on:submit=submit.clone()>
                    <PasswordInput
                        id="new-password"
                        label="Nueva contraseña"
                        autocomplete="new-password"
                        value=password
                        error=password_error
                    />
                    <PasswordInput
                        id="confirm-password"
                        label="Confirmar contraseña"
                        autocomplete="new-password"
                        value=confirm
                        error=confirm_error
                    />
                    <button type="submit" class="btn-primary auth-submit" prop:disabled=move || busy.get()>
                        <Show when=move || busy.get()>
                            <span class="spinner" aria-hidden="true"></span>
                        </Show>
                        {move || if busy.get() { "Restableciendo..." } else { "Restablecer contraseña" }}
                    </button>
                </form>
            </Show>
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

    fn status(status: u16, message: &str) -> ApiError {
        ApiError::Status { status, message: message.into() }
    }

    #[test]
    fn test_reset_failure_detects_bad_token() {
        assert_eq!(reset_failure(&status(400, "Bad request")), ResetFailure::BadToken);
        assert_eq!(reset_failure(&status(422, "Token expired")), ResetFailure::BadToken);
        assert_eq!(
            reset_failure(&status(502, "Bad gateway")),
            ResetFailure::Toast("Error del servidor. Por favor intenta más tarde.")
        );
        assert!(matches!(reset_failure(&ApiError::Network("offline".into())), ResetFailure::Toast(m) if m.starts_with("Error de conexión")));
    }
}
