//! App Header Component
//!
//! Top bar of the signed-in views: brand, user avatar and name, and the
//! dashboard/calendar/profile/logout actions.

use leptos::prelude::*;

use crate::context::use_app;
use crate::models::User;

#[component]
pub fn AppHeader(
    #[prop(into)] user: Signal<Option<User>>,
    /// Route of the view hosting the header; its button is marked current
    current: &'static str,
) -> impl IntoView {
    let ctx = use_app();

    let nav_button = move |route: &'static str, label: &'static str| {
        view! {
            <button
                type="button"
                class="header-btn"
                class:active=move || current == route
                aria-current=move || (current == route).then_some("page")
                on:click=move |_| ctx.navigate(route)
            >
                {label}
            </button>
        }
    };

    view! {
        <header class="app-header">
            <div class="brand" on:click=move |_| ctx.navigate("dashboard")>
                <span class="brand-logo" aria-hidden="true">"✔"</span>
                <span class="brand-name">"TidyTasks"</span>
            </div>
            <nav class="header-actions" aria-label="Navegación principal">
                {nav_button("dashboard", "Tablero")}
                {nav_button("calendar", "Calendario")}
                <button
                    type="button"
                    class="user-chip"
                    title="Mi perfil"
                    on:click=move |_| ctx.navigate("profile")
                >
                    <span class="avatar">{move || user.get().map(|u| u.initial()).unwrap_or_else(|| "U".into())}</span>
                    <span class="user-name">
                        {move || user.get().map(|u| u.full_name()).filter(|n| !n.is_empty()).unwrap_or_else(|| "Usuario".into())}
                    </span>
                </button>
                <button type="button" class="header-btn logout-btn" on:click=move |_| ctx.logout()>
                    "Cerrar sesión"
                </button>
            </nav>
        </header>
    }
}
