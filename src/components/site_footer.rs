//! Site Footer Component
//!
//! Site map, informational dialogs, theme toggle and scroll-to-top. Shown on
//! every view except the OAuth callback.

use leptos::prelude::*;

use crate::context::use_app;
use crate::footer::{self, Theme};

const INFO_PAGES: &[(&str, &str, &str)] = &[
    ("help", "Centro de Ayuda", "Aquí encontrarás respuestas a las preguntas más frecuentes sobre TidyTasks."),
    ("contact", "Contacto", "¿Necesitas ayuda? Escríbenos a: support@tidytasks.com"),
    ("feedback", "Feedback", "Tu opinión es importante para nosotros. Comparte tus sugerencias para mejorar TidyTasks."),
    ("report", "Reportar Problema", "Si encontraste un error o problema, por favor describe los detalles y te ayudaremos a solucionarlo."),
    ("privacy", "Política de Privacidad", "En TidyTasks respetamos tu privacidad y protegemos tus datos personales."),
    ("terms", "Términos de Servicio", "Al usar TidyTasks, aceptas nuestros términos y condiciones de uso del servicio."),
    ("cookies", "Política de Cookies", "Utilizamos cookies para mejorar tu experiencia en TidyTasks y personalizar el contenido."),
    ("security", "Seguridad", "Implementamos medidas de seguridad para proteger tus datos."),
];

fn info_page(key: &str) -> Option<(&'static str, &'static str)> {
    INFO_PAGES.iter().find(|(k, _, _)| *k == key).map(|(_, title, body)| (*title, *body))
}

/// Routed footer link
#[component]
fn FooterLink(route: &'static str, label: &'static str) -> impl IntoView {
    let ctx = use_app();
    view! {
        <li>
            <a
                href=crate::router::routes::url_for(route, "")
                class="footer-link"
                on:click=move |ev| {
                    ev.prevent_default();
                    ctx.navigate(route);
                }
            >
                {label}
            </a>
        </li>
    }
}

#[component]
pub fn SiteFooter() -> impl IntoView {
    let ctx = use_app();
    let theme = RwSignal::new(footer::stored_theme(&ctx.session()));
    let (dialog, set_dialog) = signal(None::<(&'static str, &'static str)>);
    let year = js_sys::Date::new_0().get_full_year();

    let info_link = move |key: &'static str| {
        let label = info_page(key).map(|(title, _)| title).unwrap_or(key);
        view! {
            <li>
                <a
                    href="#"
                    class="footer-link"
                    on:click=move |ev| {
                        ev.prevent_default();
                        set_dialog.set(info_page(key));
                    }
                >
                    {label}
                </a>
            </li>
        }
    };

    view! {
        <footer class="site-footer" class:hidden=move || !ctx.footer_visible.get()>
            <div class="footer-container">
                <nav class="footer-nav" aria-label="Mapa del sitio">
                    <div class="footer-nav-section">
                        <h4 class="footer-nav-title">"Aplicación"</h4>
                        <ul class="footer-nav-list">
                            <FooterLink route="home" label="Inicio" />
                            <Show when=move || ctx.authenticated.get()>
                                <FooterLink route="dashboard" label="Dashboard" />
                                <FooterLink route="calendar" label="Calendario" />
                                <FooterLink route="profile" label="Mi Perfil" />
                            </Show>
                        </ul>
                    </div>
                    <Show when=move || !ctx.authenticated.get()>
                        <div class="footer-nav-section">
                            <h4 class="footer-nav-title">"Cuenta"</h4>
                            <ul class="footer-nav-list">
                                <FooterLink route="login" label="Iniciar Sesión" />
                                <FooterLink route="signup" label="Registrarse" />
                                <FooterLink route="recovery" label="Recuperar Cuenta" />
                            </ul>
                        </div>
                    </Show>
                    <div class="footer-nav-section">
                        <h4 class="footer-nav-title">"Soporte"</h4>
                        <ul class="footer-nav-list">
                            {info_link("help")}
                            {info_link("contact")}
                            {info_link("feedback")}
                            {info_link("report")}
                        </ul>
                    </div>
                    <div class="footer-nav-section">
                        <h4 class="footer-nav-title">"Legal"</h4>
                        <ul class="footer-nav-list">
                            {info_link("privacy")}
                            {info_link("terms")}
                            {info_link("cookies")}
                            {info_link("security")}
                        </ul>
                    </div>
                </nav>

                <div class="footer-bottom">
                    <div class="footer-copyright">
                        <p>{format!("© {} TidyTasks. Todos los derechos reservados.", year)}</p>
                        <p class="footer-tagline">"Organiza tu vida, alcanza tus metas."</p>
                    </div>
                    <div class="footer-utilities">
                        <button
                            type="button"
                            class="scroll-to-top"
                            title="Volver arriba"
                            aria-label="Volver al inicio de la página"
                            on:click=move |_| footer::scroll_to_top()
                        >
                            "↑"
                        </button>
                        <button
                            type="button"
                            class="theme-toggle"
                            title="Cambiar tema"
                            aria-label="Alternar tema claro/oscuro"
                            aria-pressed=move || if theme.get() == Theme::Dark { "true" } else { "false" }
                            on:click=move |_| theme.set(footer::toggle_theme(&ctx.session()))
                        >
                            {move || if theme.get() == Theme::Dark { "☀" } else { "☾" }}
                        </button>
                    </div>
                </div>
            </div>

            {move || dialog.get().map(|(title, body)| view! {
                <div
                    class="footer-modal show"
                    role="dialog"
                    aria-modal="true"
                    on:click=move |_| set_dialog.set(None)
                >
                    <div class="footer-modal-content" on:click=|ev| ev.stop_propagation()>
                        <div class="footer-modal-header">
                            <h3 class="footer-modal-title">{title}</h3>
                            <button
                                type="button"
                                class="footer-modal-close"
                                aria-label="Cerrar"
                                on:click=move |_| set_dialog.set(None)
                            >
                                "×"
                            </button>
                        </div>
                        <p class="footer-modal-text">{body}</p>
                    </div>
                </div>
            })}
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_pages_resolve() {
        assert_eq!(info_page("contact").map(|(t, _)| t), Some("Contacto"));
        assert!(info_page("unknown").is_none());
    }
}
