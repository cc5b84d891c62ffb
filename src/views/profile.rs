//! Profile View

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{mount_view, ViewHandle};
use crate::commands;
use crate::components::{AppHeader, DeleteConfirmButton};
use crate::context::{use_app, AppContext};
use crate::models::User;

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <ProfilePage /> }.into_any())
}

#[derive(Debug, Clone, PartialEq)]
enum ProfileState {
    Loading,
    Ready(User),
    Failed(&'static str),
}

async fn load_profile(ctx: AppContext, state: RwSignal<ProfileState>, user: RwSignal<Option<User>>) {
    state.try_set(ProfileState::Loading);
    match commands::get_profile(&ctx.api()).await {
        Ok(profile) => {
            ctx.session().store_user(&profile);
            user.try_set(Some(profile.clone()));
            state.try_set(ProfileState::Ready(profile));
        }
        Err(e) if e.is_auth() => ctx.on_auth_failure(),
        Err(e) => {
            log::warn!("[PROFILE] Could not fetch profile: {}", e);
            let next = match ctx.session().user() {
                Some(stored) => ProfileState::Ready(stored),
                None if e.is_server() => ProfileState::Failed("No pudimos obtener tu perfil"),
                None => ProfileState::Failed("Error al cargar el perfil"),
            };
            state.try_set(next);
        }
    }
}

#[component]
fn ProfileDetails(profile: User) -> impl IntoView {
    let age = profile.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
    let since = profile.member_since().unwrap_or_else(|| "Fecha no disponible".to_string());

    view! {
        <div class="profile-card">
            <div class="profile-avatar" aria-hidden="true">{profile.initial()}</div>
            <h2 class="profile-full-name">{profile.full_name()}</h2>
            <dl class="profile-fields">
                <dt>"Nombre"</dt>
                <dd>{profile.first_name.clone()}</dd>
                <dt>"Apellido"</dt>
                <dd>{profile.last_name.clone()}</dd>
                <dt>"Edad"</dt>
                <dd>{age}</dd>
                <dt>"Correo electrónico"</dt>
                <dd>{profile.email.clone()}</dd>
                <dt>"Miembro desde"</dt>
                <dd>{since}</dd>
            </dl>
        </div>
    }
}

#[component]
fn ProfilePage() -> impl IntoView {
    let ctx = use_app();
    let user = RwSignal::new(ctx.session().user());
    let state = RwSignal::new(ProfileState::Loading);
    let deleting = RwSignal::new(false);

    spawn_local(load_profile(ctx, state, user));

    let on_delete = Callback::new(move |()| {
        if deleting.get_untracked() {
            return;
        }
        deleting.set(true);
        spawn_local(async move {
            match commands::delete_account(&ctx.api()).await {
                Ok(()) => {
                    log::info!("[PROFILE] Account deleted");
                    ctx.session().clear();
                    ctx.refresh_auth();
                    ctx.toaster.success("Tu cuenta ha sido eliminada exitosamente");
                    ctx.navigate("home");
                }
                Err(e) if e.is_auth() => ctx.on_auth_failure(),
                Err(e) => {
                    log::error!("[PROFILE] Account deletion failed: {}", e);
                    deleting.try_set(false);
                    ctx.toaster.error("Error al eliminar la cuenta");
                }
            }
        });
    });

    view! {
        <div class="profile-page">
            <AppHeader user=user current="profile" />
            <main class="profile-main">
                <h1>"Mi perfil"</h1>
                {move || match state.get() {
                    ProfileState::Loading => view! {
                        <div class="profile-skeleton" role="status" aria-label="Cargando perfil">
                            <div class="skeleton-avatar"></div>
                            <div class="skeleton-line"></div>
                            <div class="skeleton-line short"></div>
                        </div>
                    }
                    .into_any(),
                    ProfileState::Failed(message) => view! {
                        <div class="profile-error" role="alert">
                            <p>{message}</p>
                            <button
                                type="button"
                                class="btn-secondary"
                                on:click=move |_| spawn_local(load_profile(ctx, state, user))
                            >
                                "Reintentar"
                            </button>
                        </div>
                    }
                    .into_any(),
                    ProfileState::Ready(profile) => view! { <ProfileDetails profile=profile /> }.into_any(),
                }}

                <div class="profile-actions">
                    <button type="button" class="btn-primary" on:click=move |_| ctx.navigate("profile/edit")>
                        "Editar perfil"
                    </button>
                    <button type="button" class="btn-secondary" on:click=move |_| ctx.navigate("dashboard")>
                        "Volver al tablero"
                    </button>
                    <button type="button" class="btn-secondary" on:click=move |_| ctx.logout()>
                        "Cerrar sesión"
                    </button>
                </div>

                <section class="danger-zone">
                    <h2>"Eliminar cuenta"</h2>
                    <p>"Esta acción es permanente y eliminará todas tus tareas."</p>
                    <Show
                        when=move || !deleting.get()
                        fallback=|| view! { <span class="spinner" aria-label="Eliminando cuenta"></span> }
                    >
                        <DeleteConfirmButton
                            button_class="btn-danger"
                            label="Eliminar cuenta"
                            question="¿Eliminar tu cuenta definitivamente?"
                            on_confirm=on_delete
                        />
                    </Show>
                </section>
            </main>
        </div>
    }
}
