//! Landing Page

use leptos::ev;
use leptos::prelude::*;

use super::{mount_view, ViewHandle};
use crate::context::{use_app, AppContext};

const SCROLLED_PX: f64 = 100.0;

const FEATURES: [(&str, &str, &str); 4] = [
    ("📋", "Tablero Kanban", "Organiza tus tareas en Por hacer, Haciendo y Hecho, y muévelas arrastrando."),
    ("📅", "Calendario", "Visualiza tus tareas por día o por semana y crea nuevas directamente en su horario."),
    ("🔄", "Siempre sincronizado", "Tus tareas se actualizan automáticamente en todos tus dispositivos."),
    ("🔒", "Seguro", "Inicia sesión con tu correo o con Google y mantén tu información protegida."),
];

pub fn setup(ctx: AppContext, root: web_sys::HtmlElement) -> ViewHandle {
    mount_view(ctx, root, || view! { <HomePage /> }.into_any())
}

fn scroll_to_features() {
    if let Some(section) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(".features-section").ok().flatten())
    {
        section.scroll_into_view();
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let ctx = use_app();
    let menu_open = RwSignal::new(false);
    let scrolled = RwSignal::new(false);

    let scroll = window_event_listener(ev::scroll, move |_| {
        let y = web_sys::window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0);
        scrolled.set(y > SCROLLED_PX);
    });
    on_cleanup(move || scroll.remove());

    let go = move |route: &'static str| {
        move |_: web_sys::MouseEvent| {
            menu_open.set(false);
            ctx.navigate(route);
        }
    };

    view! {
        <div class="landing">
            <header class="landing-header" class:scrolled=move || scrolled.get()>
                <span class="brand">"TidyTasks"</span>
                <button
                    type="button"
                    class="hamburger"
                    class:active=move || menu_open.get()
                    aria-label="Menú"
                    aria-expanded=move || if menu_open.get() { "true" } else { "false" }
                    on:click=move |_| menu_open.update(|open| *open = !*open)
                >
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <nav class="landing-nav" class:active=move || menu_open.get()>
                    <Show
                        when=move || ctx.authenticated.get()
                        fallback=move || view! {
                            <div class="landing-actions">
                                <button type="button" class="btn-secondary" on:click=go("login")>
                                    "Iniciar sesión"
                                </button>
                                <button type="button" class="btn-primary" on:click=go("signup")>
                                    "Registrarse"
                                </button>
                            </div>
                        }
                    >
                        <div class="landing-actions">
                            <button type="button" class="btn-primary btn-float" on:click=go("dashboard")>
                                "Ir al Dashboard"
                            </button>
                        </div>
                    </Show>
                </nav>
            </header>

            <section class="hero-section">
                <h1>"Organiza tu día, sin complicaciones"</h1>
                <p>"TidyTasks te ayuda a planear, priorizar y terminar lo que importa."</p>
                <div class="hero-actions">
                    <button type="button" class="btn-primary" on:click=go("signup")>"Comenzar Gratis"</button>
                    <button type="button" class="btn-secondary" on:click=move |_| scroll_to_features()>
                        "Saber Más"
                    </button>
                </div>
            </section>

            <section class="features-section">
                <h2>"Todo lo que necesitas"</h2>
                <div class="features-grid">
                    {FEATURES
                        .into_iter()
                        .map(|(icon, title, text)| view! {
                            <article class="feature-card">
                                <span class="feature-icon" aria-hidden="true">{icon}</span>
                                <h3>{title}</h3>
                                <p>{text}</p>
                            </article>
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="cta-section">
                <h2>"¿Listo para empezar?"</h2>
                <button type="button" class="btn-primary" on:click=go("signup")>"Comenzar Ahora"</button>
            </section>
        </div>
    }
}
