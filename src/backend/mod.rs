/// Backend access for the chat widget
///
/// The widget talks to a conversation service through two calls: send a
/// message and reset the conversation. `ChatBackend` is the seam the
/// controller is written against; `HttpBackend` is the production
/// implementation over reqwest.
///
/// # Usage
///
/// ```rust,no_run
/// use chat_widget::backend::{ChatBackend, HttpBackend};
///
/// # async fn example() -> chat_widget::backend::ChatResult<()> {
/// let backend = HttpBackend::new("http://127.0.0.1:5000")?;
/// let reply = backend.send_message("Hola").await?;
/// println!("{}", reply.response);
/// # Ok(())
/// # }
/// ```
mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================
// Error Types
// ============================================

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type ChatResult<T> = Result<T, ChatError>;

// ============================================
// Wire Types
// ============================================

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub message: &'a str,
}

/// Body of a successful `/send_message` call.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SendReply {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub user_info: Option<serde_json::Value>,
}

impl SendReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }
}

/// Body of a `/reset_conversation` call. A missing status counts as failure.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResetReply {
    #[serde(default)]
    pub status: Option<String>,
}

impl ResetReply {
    pub const SUCCESS: &'static str = "success";

    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(Self::SUCCESS)
    }
}

// ============================================
// Backend Trait
// ============================================

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ChatBackend {
    /// Deliver one message (possibly empty, which asks for a greeting) and
    /// wait for the bot's reply.
    async fn send_message(&self, message: &str) -> ChatResult<SendReply>;

    async fn reset_conversation(&self) -> ChatResult<ResetReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_reply_accepts_extra_fields() {
        let body = r#"{"response":"Hola","session_id":"abc","intent":"","user_info":{"name":"Ana"}}"#;
        let reply: SendReply = serde_json::from_str(body).expect("valid reply");
        assert_eq!(reply.response, "Hola");
        assert_eq!(reply.session_id.as_deref(), Some("abc"));
        assert_eq!(reply.user_info, Some(serde_json::json!({"name": "Ana"})));
    }

    #[test]
    fn test_send_reply_requires_response() {
        assert!(serde_json::from_str::<SendReply>(r#"{"reply":"x"}"#).is_err());
    }

    #[test]
    fn test_reset_status() {
        assert!(ResetReply::with_status("success").is_success());
        assert!(!ResetReply::with_status("failure").is_success());
        let absent: ResetReply = serde_json::from_str("{}").expect("empty object");
        assert!(!absent.is_success());
    }

    #[test]
    fn test_send_request_shape() {
        let body = serde_json::to_value(SendRequest { message: "" }).expect("serializable");
        assert_eq!(body, serde_json::json!({"message": ""}));
    }
}
