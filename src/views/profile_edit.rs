//! Profile Edit View
//!
//! Two independent forms: profile data (saved only when something changed)
//! and password change.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{mount_view, ViewHandle};
use crate::commands;
use crate::components::{AppHeader, PasswordInput, TextField};
use crate::context::{use_app, AppContext};
use crate::error::ApiError;
use crate::models::{PasswordChange, ProfileUpdate, User};
use crate::validation;

const FIX_ERRORS: &str = "Por favor, corrige los errores en el formulario";

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <ProfileEditPage /> }.into_any())
}

/// Validated form contents, or `None` while any field is invalid
pub fn read_profile_form(first: &str, last: &str, age: &str, email: &str) -> Option<ProfileUpdate> {
    validation::profile_first_name(first).ok()?;
    validation::profile_last_name(last).ok()?;
    let age = validation::profile_age(age).ok()?;
    validation::profile_email(email).ok()?;
    Some(ProfileUpdate {
        first_name: first.trim().to_string(),
        last_name: last.trim().to_string(),
        age: Some(age),
        email: email.trim().to_string(),
    })
}

pub fn has_changes(original: Option<&ProfileUpdate>, update: &ProfileUpdate) -> bool {
    original.is_some_and(|original| original != update)
}

/// Server message when there is one, `fallback` otherwise
fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        _ if err.is_server() => "Error interno del servidor".to_string(),
        ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

#[component]
fn ProfileEditPage() -> impl IntoView {
    let ctx = use_app();
    let user = RwSignal::new(ctx.session().user());
    let original = RwSignal::new(None::<ProfileUpdate>);

    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let age = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let saving = RwSignal::new(false);

    let fill = move |profile: &User| {
        first_name.try_set(profile.first_name.clone());
        last_name.try_set(profile.last_name.clone());
        age.try_set(profile.age.map(|a| a.to_string()).unwrap_or_default());
        email.try_set(profile.email.clone());
        original.try_set(Some(ProfileUpdate::from_user(profile)));
    };

    if let Some(stored) = user.get_untracked() {
        fill(&stored);
    }
    spawn_local(async move {
        match commands::get_profile(&ctx.api()).await {
            Ok(profile) => fill(&profile),
            Err(e) if e.is_auth() => ctx.on_auth_failure(),
            Err(e) => {
                log::warn!("[PROFILE] Could not fetch profile, editing stored copy: {}", e);
                if original.try_get_untracked().flatten().is_none() {
                    ctx.toaster.error("Error al cargar los datos");
                }
            }
        }
    });

    let first_error = Signal::derive(move || validation::profile_first_name(&first_name.get()).err());
    let last_error = Signal::derive(move || validation::profile_last_name(&last_name.get()).err());
    let age_error = Signal::derive(move || validation::profile_age(&age.get()).err());
    let email_error = Signal::derive(move || validation::profile_email(&email.get()).err());

    let update = Memo::new(move |_| read_profile_form(&first_name.get(), &last_name.get(), &age.get(), &email.get()));
    let can_save = move || {
        !saving.get()
            && update.with(|u| u.as_ref().is_some_and(|u| original.with(|o| has_changes(o.as_ref(), u))))
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let Some(body) = update.get_untracked() else {
            ctx.toaster.error(FIX_ERRORS);
            return;
        };
        saving.set(true);
        spawn_local(async move {
            let result = commands::update_profile(&ctx.api(), &body).await;
            saving.try_set(false);
            match result {
                Ok(updated) => {
                    log::info!("[PROFILE] Profile updated");
                    let mut stored = ctx.session().user().unwrap_or_default();
                    stored.first_name = updated.first_name;
                    stored.last_name = updated.last_name;
                    stored.age = updated.age;
                    stored.email = updated.email;
                    ctx.session().store_user(&stored);
                    user.try_set(Some(stored));
                    ctx.toaster.success("Perfil actualizado exitosamente");
                    ctx.navigate("profile");
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[PROFILE] Profile update failed: {}", e);
                    ctx.toaster.error(&failure_message(&e, "Error al actualizar el perfil"));
                }
            }
        });
    };

    let current = RwSignal::new(String::new());
    let new_secret = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let changing = RwSignal::new(false);
    let password_attempted = RwSignal::new(false);

    let shown = move |value: RwSignal<String>, result: Result<(), &'static str>| {
        if password_attempted.get() || !value.with(String::is_empty) {
            result.err()
        } else {
            None
        }
    };
    let current_error = Signal::derive(move || shown(current, validation::current_password(&current.get())));
    let new_error = Signal::derive(move || shown(new_secret, validation::new_password(&new_secret.get())));
    let confirm_error = Signal::derive(move || {
        shown(confirm, new_secret.with(|pw| validation::confirm_new_password(pw, &confirm.get())))
    });

    let change_password = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        password_attempted.set(true);
        if changing.get_untracked() {
            return;
        }
        let change = PasswordChange {
            current_password: current.get_untracked(),
            new_password: new_secret.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        let valid = validation::current_password(&change.current_password).is_ok()
            && validation::new_password(&change.new_password).is_ok()
            && validation::confirm_new_password(&change.new_password, &change.confirm_password).is_ok();
        if !valid {
            ctx.toaster.error(FIX_ERRORS);
            return;
        }

        changing.set(true);
        spawn_local(async move {
            let result = commands::change_password(&ctx.api(), &change).await;
            changing.try_set(false);
            match result {
                Ok(()) => {
                    log::info!("[PROFILE] Password changed");
                    password_attempted.try_set(false);
                    current.try_set(String::new());
                    new_secret.try_set(String::new());
                    confirm.try_set(String::new());
                    ctx.toaster.success("Contraseña actualizada exitosamente");
                }
                Err(ApiError::AuthRequired) => ctx.on_auth_failure(),
                Err(e) => {
                    log::warn!("[PROFILE] Password change failed: {}", e);
                    ctx.toaster.error(&failure_message(&e, "Error al cambiar la contraseña"));
                }
            }
        });
    };

    view! {
        <div class="profile-page">
            <AppHeader user=user current="profile" />
            <main class="profile-main">
                <button type="button" class="back-link" on:click=move |_| ctx.navigate("profile")>
                    "← Volver al perfil"
                </button>

                <section class="edit-section">
                    <h1>"Editar perfil"</h1>
                    <form class="profile-form" novalidate=true on:submit=save>
                        <div class="form-row">
                            <TextField id="firstName" label="Nombre" value=first_name error=first_error />
                            <TextField id="lastName" label="Apellido" value=last_name error=last_error />
                        </div>
                        <TextField id="age" label="Edad" input_type="number" value=age error=age_error />
                        <TextField
                            id="email"
                            label="Correo electrónico"
                            input_type="email"
                            autocomplete="email"
                            value=email
                            error=email_error
                        />
                        <div class="form-actions">
                            <button type="button" class="btn-secondary" on:click=move |_| ctx.navigate("profile")>
                                "Cancelar"
                            </button>
                            <button type="submit" class="btn-primary" prop:disabled=move || !can_save()>
                                <Show when=move || saving.get()>
                                    <span class="spinner" aria-hidden="true"></span>
                                </Show>
                                "Guardar cambios"
                            </button>
                        </div>
                    </form>
                </section>

                <section class="edit-section">
                    <h2>"Cambiar contraseña"</h2>
                    <form class="password-form" novalidate=true on:submit=change_password>
                        <PasswordInput
                            id="currentPassword"
                            label="Contraseña actual"
                            value=current
                            error=current_error
                        />
                        <PasswordInput
                            id="newPassword"
                            label="Nueva contraseña"
                            autocomplete="new-password"
                            value=new_secret
                            error=new_error
                        />
                        <PasswordInput
                            id="confirmPassword"
                            label="Confirmar nueva contraseña"
                            autocomplete="new-password"
                            value=confirm
                            error=confirm_error
                        />
                        <button type="submit" class="btn-primary" prop:disabled=move || changing.get()>
                            <Show when=move || changing.get()>
                                <span class="spinner" aria-hidden="true"></span>
                            </Show>
                            "Cambiar contraseña"
                        </button>
                    </form>
                </section>
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_profile_form_trims_and_validates() {
        let update = read_profile_form(" Ana ", "Gómez", "30", " ana@b.co ").unwrap();
        assert_eq!(update.first_name, "Ana");
        assert_eq!(update.email, "ana@b.co");
        assert_eq!(update.age, Some(30));

        assert!(read_profile_form("", "Gómez", "30", "ana@b.co").is_none());
        assert!(read_profile_form("Ana", "Gómez", "121", "ana@b.co").is_none());
        assert!(read_profile_form("Ana", "Gómez", "30", "ana").is_none());
    }

    #[test]
    fn test_save_needs_a_change() {
        let original = read_profile_form("Ana", "Gómez", "30", "ana@b.co").unwrap();
        let same = original.clone();
        let older = ProfileUpdate { age: Some(31), ..original.clone() };

        assert!(!has_changes(Some(&original), &same));
        assert!(has_changes(Some(&original), &older));
        assert!(!has_changes(None, &older));
    }

    #[test]
    fn test_failure_message_prefers_server_text() {
        let conflict = ApiError::Status { status: 409, message: "Email en uso".into() };
        assert_eq!(failure_message(&conflict, "fallback"), "Email en uso");
        let server = ApiError::Status { status: 500, message: "boom".into() };
        assert_eq!(failure_message(&server, "fallback"), "Error interno del servidor");
        assert_eq!(failure_message(&ApiError::Network("x".into()), "fallback"), "fallback");
    }
}
