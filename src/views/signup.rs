//! Signup View
//!
//! Field errors stay hidden until the first submit; after that every field
//! re-validates as it is edited.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{check_existing_session, mount_view, ViewHandle, MIN_SUBMIT_MS, REDIRECT_DELAY_MS};
use crate::commands;
use crate::components::{GoogleButton, PasswordInput, TextField};
use crate::context::{use_app, AppContext};
use crate::error::ApiError;
use crate::models::SignupRequest;
use crate::session::GOOGLE_ATTEMPT_KEY;
use crate::validation;

const EMAIL_TAKEN: &str = "Este email ya está registrado";

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <SignupPage /> }.into_any())
}

#[derive(Debug, PartialEq)]
pub enum SignupFailure {
    EmailTaken,
    Other(&'static str),
}

impl SignupFailure {
    pub fn from_error(err: &ApiError) -> Self {
        let taken = match err {
            ApiError::Status { status: 409, .. } => true,
            ApiError::Status { message, .. } => message.to_lowercase().contains("already registered"),
            _ => false,
        };
        if taken {
            return Self::EmailTaken;
        }
        Self::Other(match err.status() {
            Some(500) => "Error del servidor. Por favor intente más tarde.",
            Some(400) => "Datos inválidos. Por favor verifique su información.",
            _ => "Error al crear la cuenta. Por favor verifique su información e intente nuevamente.",
        })
    }

    pub fn toast(&self) -> &'static str {
        match self {
            Self::EmailTaken => "Este email ya está registrado. Por favor usa otro email o inicia sesión.",
            Self::Other(message) => message,
        }
    }
}

#[component]
fn SignupPage() -> impl IntoView {
    let ctx = use_app();
    ctx.session().remove(GOOGLE_ATTEMPT_KEY);
    check_existing_session(ctx);

    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let age = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());

    let attempted = RwSignal::new(false);
    let email_taken = RwSignal::new(false);
    let busy = RwSignal::new(false);

    Effect::new(move |_| {
        email.track();
        email_taken.set(false);
    });

    let checked = move |result: Result<(), &'static str>| if attempted.get() { result.err() } else { None };
    let first_error = Signal::derive(move || checked(validation::person_name(&first_name.get())));
    let last_error = Signal::derive(move || checked(validation::person_name(&last_name.get())));
    let email_error = Signal::derive(move || {
        if email_taken.get() {
            return Some(EMAIL_TAKEN);
        }
        checked(validation::signup_email(&email.get()))
    });
    let age_error = Signal::derive(move || checked(validation::signup_age(&age.get()).map(|_| ())));
    let password_error = Signal::derive(move || checked(validation::strong_password(&password.get())));
    let confirm_error =
        Signal::derive(move || checked(password.with(|pw| validation::confirm_password(pw, &confirm.get()))));

    let build_request = move || -> Option<SignupRequest> {
        let first = first_name.get_untracked().trim().to_string();
        let last = last_name.get_untracked().trim().to_string();
        let address = email.get_untracked().trim().to_string();
        let secret = password.get_untracked();
        validation::person_name(&first).ok()?;
        validation::person_name(&last).ok()?;
        validation::signup_email(&address).ok()?;
        let years = validation::signup_age(&age.get_untracked()).ok()?;
        validation::strong_password(&secret).ok()?;
        validation::confirm_password(&secret, &confirm.get_untracked()).ok()?;
        Some(SignupRequest { first_name: first, last_name: last, email: address, age: years, password: secret })
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        attempted.set(true);
        if busy.get_untracked() {
            return;
        }
        let Some(request) = build_request() else { return };

        busy.set(true);
        spawn_local(async move {
            let started = js_sys::Date::now();
            let result = commands::signup(&ctx.api(), &request).await;
            let elapsed = (js_sys::Date::now() - started) as u32;
            TimeoutFuture::new(MIN_SUBMIT_MS.saturating_sub(elapsed)).await;

            match result {
                Ok(Some(auth)) => {
                    log::info!("[AUTH] Account created and signed in");
                    ctx.session().store_login(&auth.token, &auth.user);
                    ctx.refresh_auth();
                    ctx.toaster
                        .success(&format!("¡Cuenta creada exitosamente! Bienvenido, {}!", auth.user.first_name));
                    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    ctx.navigate_to("dashboard", true);
                }
                Ok(None) => {
                    log::info!("[AUTH] Account created");
                    ctx.toaster.success("¡Cuenta creada exitosamente! Ya puedes iniciar sesión.");
                    ctx.navigate_to("login", true);
                }
                Err(e) => {
                    log::warn!("[AUTH] Signup failed: {}", e);
                    busy.try_set(false);
                    let failure = SignupFailure::from_error(&e);
                    if failure == SignupFailure::EmailTaken {
                        email_taken.try_set(true);
                    }
                    ctx.toaster.error(failure.toast());
                }
            }
        });
    };

    let go = move |route: &'static str| {
        move |ev: web_sys::MouseEvent| {
            ev.prevent_default();
            ctx.navigate_to(route, true);
        }
    };

    view! {
        <section class="auth-card signup-card">
            <a href="/" class="back-link" on:click=go("home")>"← Volver al inicio"</a>
            <h1>"Crear cuenta"</h1>
            <p class="auth-subtitle">"Empieza a organizar tus tareas con TidyTasks"</p>
            <form class="auth-form" novalidate=true on:submit=submit>
                <div class="form-row">
                    <TextField
                        id="firstName"
                        label="Nombre"
                        autocomplete="given-name"
                        value=first_name
                        error=first_error
                    />
                    <TextField
                        id="lastName"
                        label="Apellido"
                        autocomplete="family-name"
                        value=last_name
                        error=last_error
                    />
                </div>
                <TextField
                    id="email"
                    label="Correo electrónico"
                    input_type="email"
                    placeholder="tu@correo.com"
                    autocomplete="email"
                    value=email
                    error=email_error
                />
                <TextField id="age" label="Edad" input_type="number" value=age error=age_error />
                <PasswordInput
                    id="password"
                    label="Contraseña"
                    autocomplete="new-password"
                    value=password
                    error=password_error
                />
                <PasswordInput
                    id="confirmPassword"
                    label="Confirmar contraseña"
                    autocomplete="new-password"
                    value=confirm
                    error=confirm_error
                />
                <p class="password-hint">
                    "Mínimo 8 caracteres, con mayúscula, minúscula, número y carácter especial."
                </p>
                <button type="submit" class="btn-primary auth-submit" prop:disabled=move || busy.get()>
                    <Show when=move || busy.get()>
                        <span class="spinner" aria-hidden="true"></span>
                    </Show>
                    {move || if busy.get() { "Creando Cuenta..." } else { "Crear Cuenta" }}
                </button>
            </form>
            <div class="auth-divider"><span>"o"</span></div>
            <GoogleButton label="Registrarse con Google" busy=busy />
            <p class="auth-switch">
                "¿Ya tienes cuenta? "
                <a href="/login" class="auth-link" on:click=go("login")>"Inicia sesión"</a>
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
    fn test_signup_failure_mapping() {
        assert_eq!(SignupFailure::from_error(&status(409, "Conflict")), SignupFailure::EmailTaken);
        assert_eq!(
            SignupFailure::from_error(&status(422, "This email is already registered")),
            SignupFailure::EmailTaken
        );
        assert_eq!(
            SignupFailure::from_error(&status(500, "boom")).toast(),
            "Error del servidor. Por favor intente más tarde."
        );
        assert_eq!(
            SignupFailure::from_error(&status(400, "bad")).toast(),
            "Datos inválidos. Por favor verifique su información."
        );
        assert!(SignupFailure::from_error(&ApiError::Network("offline".into())).toast().starts_with("Error al crear"));
    }

    #[test]
    fn test_email_taken_toast_points_to_login() {
        assert!(SignupFailure::EmailTaken.toast().contains("inicia sesión"));
    }
}
