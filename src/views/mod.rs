pub mod chat;
pub mod markdown;

pub use chat::{ChatView, SharedBackend, request_greeting, reset_conversation};
