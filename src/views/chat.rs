use crate::backend::ChatBackend;
use crate::controller::{ChatController, ExchangeTicket, ResetOutcome, SubmitOutcome};
use crate::types::{Message, Sender};
use crate::views::markdown::markdown_to_html;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::rc::Rc;
use std::time::Duration;

pub type SharedBackend = Rc<dyn ChatBackend>;

const SCROLL_TO_BOTTOM: &str = r#"
requestAnimationFrame(() => {
    const list = document.getElementById('chat-messages');
    if (list) { list.scrollTop = list.scrollHeight; }
});
"#;

fn scroll_to_bottom() {
    document::eval(SCROLL_TO_BOTTOM);
}

async fn run_exchange(
    mut controller: Signal<ChatController>,
    backend: SharedBackend,
    ticket: ExchangeTicket,
) {
    let result = backend.send_message(ticket.content()).await;
    controller.write().complete_exchange(ticket, result);
}

async fn greet_after(
    mut controller: Signal<ChatController>,
    backend: SharedBackend,
    delay: Duration,
    epoch: u64,
) {
    tokio::time::sleep(delay).await;
    let ticket = controller.write().begin_greeting(epoch);
    if let Some(ticket) = ticket {
        run_exchange(controller, backend, ticket).await;
    }
}

/// Ask the backend for a greeting once `delay` has passed, unless the
/// conversation is reset in the meantime.
pub fn request_greeting(controller: Signal<ChatController>, backend: SharedBackend, delay: Duration) {
    let epoch = controller.read().epoch();
    spawn(greet_after(controller, backend, delay, epoch));
}

/// Clear the transcript right away, then reset the server-side conversation
/// and greet again if it succeeded.
pub fn reset_conversation(
    mut controller: Signal<ChatController>,
    backend: SharedBackend,
    delay: Duration,
) {
    let ticket = controller.write().begin_reset();
    spawn(async move {
        let result = backend.reset_conversation().await;
        let outcome = controller.write().complete_reset(ticket, result);
        if outcome == ResetOutcome::Greet {
            let epoch = controller.read().epoch();
            greet_after(controller, backend, delay, epoch).await;
        }
    });
}

fn submit_input(
    mut controller: Signal<ChatController>,
    mut input: Signal<String>,
    backend: SharedBackend,
) {
    let text = input();
    let outcome = controller.write().submit(&text);
    if let SubmitOutcome::Started(ticket) = outcome {
        input.set(String::new());
        spawn(run_exchange(controller, backend, ticket));
    }
}

#[component]
pub fn ChatView(controller: Signal<ChatController>) -> Element {
    let backend = use_context::<SharedBackend>();
    let input = use_signal(String::new);

    use_effect(move || {
        // Re-run after every transcript change
        let _ = controller.read().transcript().len();
        let _ = controller.read().transcript().has_typing_indicator();
        scroll_to_bottom();
    });

    let (messages, typing, awaiting) = {
        let state = controller.read();
        (
            state.transcript().messages().to_vec(),
            state.transcript().has_typing_indicator(),
            state.is_awaiting_reply(),
        )
    };

    rsx! {
        div { id: "chat-messages", class: "chat-messages",
            for (i, message) in messages.into_iter().enumerate() {
                MessageRow { key: "{i}", message }
            }
            if typing {
                TypingIndicator {}
            }
        }
        Composer { controller, input, backend, awaiting }
    }
}

#[component]
fn MessageRow(message: Message) -> Element {
    let class = message.sender.css_class();
    rsx! {
        div { class: "message {class}",
            div { class: "message-content",
                if matches!(message.sender, Sender::Bot) {
                    div { class: "md", dangerous_inner_html: "{markdown_to_html(&message.content)}" }
                } else {
                    span { "{message.content}" }
                }
                div { class: "message-time", "{message.timestamp}" }
            }
        }
    }
}

#[component]
fn TypingIndicator() -> Element {
    rsx! {
        div { id: "typing-indicator", class: "typing-indicator bot-message message",
            div { class: "message-content",
                span {}
                span {}
                span {}
            }
        }
    }
}

#[derive(Props, Clone)]
struct ComposerProps {
    controller: Signal<ChatController>,
    input: Signal<String>,
    backend: SharedBackend,
    awaiting: bool,
}

impl PartialEq for ComposerProps {
    fn eq(&self, other: &Self) -> bool {
        self.controller == other.controller
            && self.input == other.input
            && Rc::ptr_eq(&self.backend, &other.backend)
            && self.awaiting == other.awaiting
    }
}

#[allow(non_snake_case)]
fn Composer(props: ComposerProps) -> Element {
    let ComposerProps {
        controller,
        mut input,
        backend,
        awaiting,
    } = props;
    let key_backend = backend.clone();
    let click_backend = backend;
    let blank = input().trim().is_empty();

    rsx! {
        div { class: "chat-input",
            input {
                id: "message-input",
                r#type: "text",
                placeholder: "Escribe un mensaje…",
                autofocus: true,
                value: "{input}",
                oninput: move |ev| input.set(ev.value()),
                onkeydown: move |ev| {
                    if ev.key() == Key::Enter {
                        ev.prevent_default();
                        submit_input(controller, input, key_backend.clone());
                    }
                },
            }
            button {
                id: "send-btn",
                class: "btn btn-primary",
                r#type: "button",
                disabled: awaiting || blank,
                onclick: move |_| submit_input(controller, input, click_backend.clone()),
                "Enviar"
            }
        }
    }
}
