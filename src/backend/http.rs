use super::{ChatBackend, ChatError, ChatResult, ResetReply, SendReply, SendRequest};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

const SEND_PATH: &str = "/send_message";
const RESET_PATH: &str = "/reset_conversation";

/// Client for the conversation service's HTTP endpoints
pub struct HttpBackend {
    client: Client,
    send_url: String,
    reset_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> ChatResult<Self> {
        Ok(Self::with_client(base_url, build_client()?))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client,
            send_url: format!("{base}{SEND_PATH}"),
            reset_url: format!("{base}{RESET_PATH}"),
        }
    }
}

// The service keys the conversation on a session cookie.
#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> ChatResult<Client> {
    Ok(Client::builder().cookie_store(true).build()?)
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> ChatResult<Client> {
    Ok(Client::builder().build()?)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ChatResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ChatError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, message: &str) -> ChatResult<SendReply> {
        let response = self
            .client
            .post(&self.send_url)
            .json(&SendRequest { message })
            .send()
            .await?;
        let reply: SendReply = read_json(response).await?;
        tracing::debug!(
            session_id = ?reply.session_id,
            intent = ?reply.intent,
            user_info = ?reply.user_info,
            "received reply"
        );
        Ok(reply)
    }

    async fn reset_conversation(&self) -> ChatResult<ResetReply> {
        let response = self.client.post(&self.reset_url).send().await?;
        read_json(response).await
    }
}
