//! Login View

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{check_existing_session, mount_view, ViewHandle, MIN_SUBMIT_MS, REDIRECT_DELAY_MS};
use crate::commands;
use crate::components::{GoogleButton, PasswordInput, TextField};
use crate::context::{use_app, AppContext};
use crate::error::ApiError;
use crate::validation;

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <LoginPage /> }.into_any())
}

/// Toast text for a failed login, and whether it also goes under the fields
pub fn login_failure(err: &ApiError) -> (&'static str, bool) {
    match err.status() {
        Some(401) => ("Correo o contraseña inválidos", true),
        Some(423) => ("Cuenta temporalmente bloqueada", false),
        Some(429) => ("Demasiados intentos de inicio de sesión. Inténtalo más tarde.", false),
        Some(s) if s >= 500 => ("Error del servidor. Por favor, inténtalo más tarde", false),
        _ => ("Ocurrió un error. Por favor, inténtalo de nuevo.", false),
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    let ctx = use_app();

    if let Some(message) = ctx.session().take_logout_message() {
        ctx.toaster.success(&message);
    }
    check_existing_session(ctx);

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let email_error = RwSignal::new(None::<&'static str>);
    let password_error = RwSignal::new(None::<&'static str>);
    let busy = RwSignal::new(false);

    Effect::new(move |_| {
        email.track();
        email_error.set(None);
    });
    Effect::new(move |_| {
        password.track();
        password_error.set(None);
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let address = email.get_untracked().trim().to_string();
        let secret = password.get_untracked().trim().to_string();
        email_error.set(validation::login_email(&address).err());
        password_error.set(validation::login_password(&secret).err());
        if email_error.get_untracked().is_some() || password_error.get_untracked().is_some() {
            return;
        }

        busy.set(true);
        spawn_local(async move {
            let started = js_sys::Date::now();
            let result = commands::login(&ctx.api(), &address, &secret).await;
            let elapsed = (js_sys::Date::now() - started) as u32;
            TimeoutFuture::new(MIN_SUBMIT_MS.saturating_sub(elapsed)).await;

            match result {
                Ok(auth) => {
                    log::info!("[AUTH] Logged in");
                    ctx.session().store_login(&auth.token, &auth.user);
                    ctx.refresh_auth();
                    ctx.toaster.success(&format!("¡Bienvenido, {}!", auth.user.first_name));
                    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    ctx.navigate_to("dashboard", true);
                }
                Err(e) => {
                    log::warn!("[AUTH] Login failed: {}", e);
                    busy.try_set(false);
                    let (message, inline) = login_failure(&e);
                    if inline {
                        email_error.try_set(Some(message));
                        password_error.try_set(Some(message));
                    }
                    ctx.toaster.error(message);
                }
            }
        });
    };

    view! {
        <section class="auth-card">
            <h1>"Iniciar sesión"</h1>
            <p class="auth-subtitle">"Bienvenido de nuevo a TidyTasks"</p>
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
                <PasswordInput id="password" label="Contraseña" value=password error=password_error />
                <a
                    href="/recovery"
                    class="auth-link forgot-link"
                    on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate("recovery");
                    }
                >
                    "¿Olvidaste tu contraseña?"
                </a>
                <button type="submit" class="btn-primary auth-submit" prop:disabled=move || busy.get()>
                    <Show when=move || busy.get()>
                        <span class="spinner" aria-hidden="true"></span>
                    </Show>
                    {move || if busy.get() { "Iniciando sesión..." } else { "Iniciar sesión" }}
                </button>
            </form>
            <div class="auth-divider"><span>"o"</span></div>
            <GoogleButton label="Continuar con Google" busy=busy />
            <p class="auth-switch">
                "¿No tienes cuenta? "
                <a
                    href="/signup"
                    class="auth-link"
                    on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate("signup");
                    }
                >
                    "Regístrate"
                </a>
            </p>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> ApiError {
        ApiError::Status { status, message: "x".into() }
    }

    #[test]
    fn test_login_failure_messages() {
        assert_eq!(login_failure(&status(401)), ("Correo o contraseña inválidos", true));
        assert_eq!(login_failure(&status(423)).0, "Cuenta temporalmente bloqueada");
        assert!(login_failure(&status(429)).0.starts_with("Demasiados intentos"));
        assert!(login_failure(&status(503)).0.starts_with("Error del servidor"));
        assert_eq!(login_failure(&ApiError::Network("down".into())).1, false);
    }
}
