use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub header_class: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            header_class: "chat-header",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            header_class: "chat-header chat-header-light",
        },
    }
}

/// Layout shared by both themes; colors come from the theme variables.
pub const WIDGET_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; }
.chat-container { display: flex; flex-direction: column; height: 100vh; max-width: 720px; margin: 0 auto; }
.chat-header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1rem; border-bottom: 1px solid var(--color-border); }
.chat-header h1 { font-size: 1.1rem; margin: 0; }
.chat-messages { flex: 1; overflow-y: auto; padding: 1rem; display: flex; flex-direction: column; gap: 0.5rem; }
.message { display: flex; }
.user-message { justify-content: flex-end; }
.bot-message { justify-content: flex-start; }
.message-content { max-width: 75%; padding: 0.6rem 0.8rem; border-radius: 0.75rem; line-height: 1.4; }
.user-message .message-content { background: var(--color-chat-user-bg); color: var(--color-chat-user-text); }
.bot-message .message-content { background: var(--color-chat-bot-bg); color: var(--color-chat-bot-text); }
.message-content p { margin: 0 0 0.4rem 0; }
.message-content p:last-child { margin-bottom: 0; }
.message-time { font-size: 0.7rem; color: var(--color-timestamp); text-align: right; margin-top: 0.25rem; }
.typing-indicator .message-content { display: flex; gap: 0.25rem; align-items: center; }
.typing-indicator span { width: 0.45rem; height: 0.45rem; border-radius: 50%; background: var(--color-timestamp); animation: typing 1.2s infinite ease-in-out; }
.typing-indicator span:nth-child(2) { animation-delay: 0.2s; }
.typing-indicator span:nth-child(3) { animation-delay: 0.4s; }
@keyframes typing { 0%, 80%, 100% { opacity: 0.3; transform: translateY(0); } 40% { opacity: 1; transform: translateY(-3px); } }
.chat-input { display: flex; gap: 0.5rem; padding: 0.75rem 1rem; border-top: 1px solid var(--color-border); }
.chat-input input { flex: 1; padding: 0.55rem 0.75rem; border-radius: 0.5rem; border: 1px solid var(--color-input-border); background: var(--color-input-bg); color: var(--color-text-primary); }
.btn { padding: 0.5rem 0.9rem; border-radius: 0.5rem; border: 1px solid var(--color-border); background: transparent; color: var(--color-text-primary); cursor: pointer; }
.btn:disabled { opacity: 0.5; cursor: default; }
.btn-primary { background: var(--color-accent); border-color: var(--color-accent); color: var(--color-accent-text); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #101114;
    --color-text-primary: #f2f2f2;
    --color-border: #2c2e33;
    --color-input-border: #3a3c42;
    --color-input-bg: #17181c;
    --color-chat-user-bg: #2f6feb;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #1f2126;
    --color-chat-bot-text: #f2f2f2;
    --color-timestamp: #8b8f98;
    --color-accent: #2f6feb;
    --color-accent-text: #ffffff;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-text-primary: #16181d;
    --color-border: #e1e3e8;
    --color-input-border: #c9ccd3;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #2f6feb;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #f1f2f5;
    --color-chat-bot-text: #16181d;
    --color-timestamp: #6b707a;
    --color-accent: #2f6feb;
    --color-accent-text: #ffffff;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;
