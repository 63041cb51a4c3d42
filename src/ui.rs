use crate::backend::HttpBackend;
use crate::config::WidgetConfig;
use crate::controller::ChatController;
use crate::theme::{WIDGET_CSS, theme_definition};
use crate::types::ThemeMode;
use crate::views::{ChatView, SharedBackend, request_greeting, reset_conversation};
use dioxus::prelude::*;
use std::rc::Rc;

fn connect(base_url: &str) -> SharedBackend {
    match HttpBackend::new(base_url) {
        Ok(backend) => Rc::new(backend),
        Err(err) => {
            tracing::error!(error = %err, "failed to build HTTP client, session cookies disabled");
            Rc::new(HttpBackend::with_client(base_url, reqwest::Client::new()))
        }
    }
}

/// Root component. Expects a [`WidgetConfig`] in context.
#[component]
pub fn App() -> Element {
    let config = use_context::<WidgetConfig>();
    let backend = use_context_provider(|| connect(&config.base_url));
    let fallback = config.fallback.clone();
    let controller = use_signal(move || ChatController::new(fallback));
    let delay = config.greeting_delay;

    use_hook(move || request_greeting(controller, backend, delay));

    rsx! {
        ThemeStyles { theme: config.theme }
        div { class: "chat-container",
            ChatHeader { title: config.title.clone(), theme: config.theme, controller }
            ChatView { controller }
        }
    }
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        style { dangerous_inner_html: "{WIDGET_CSS}" }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn ChatHeader(title: String, theme: ThemeMode, controller: Signal<ChatController>) -> Element {
    let config = use_context::<WidgetConfig>();
    let backend = use_context::<SharedBackend>();
    let definition = theme_definition(theme);
    rsx! {
        div { class: "{definition.header_class}",
            h1 { "{title}" }
            button {
                id: "reset-chat",
                class: "btn",
                r#type: "button",
                onclick: move |_| reset_conversation(controller, backend.clone(), config.greeting_delay),
                "Reiniciar"
            }
        }
    }
}
