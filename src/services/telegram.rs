use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::DispatchFailure;

/// Delivers a text message to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DispatchFailure>;
}

/// Seconds Telegram holds a `getUpdates` call open.
pub const LONG_POLL_SECS: u64 = 30;

#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
    send_timeout: Duration,
}

// Every Bot API call answers with this envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TgUser>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TgUser {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl TelegramClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, send_timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            send_timeout,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, String> {
        let res = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", LONG_POLL_SECS.to_string()),
            ])
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        let status = res.status();
        let body = res
            .json::<ApiResponse<Vec<Update>>>()
            .await
            .map_err(|e| e.without_url().to_string())?;

        if !body.ok {
            return Err(format!(
                "getUpdates failed: {status} {}",
                body.description.unwrap_or_default()
            ));
        }

        Ok(body.result.unwrap_or_default())
    }

    pub async fn delete_webhook(&self) -> Result<(), String> {
        let res = self
            .http
            .post(self.method_url("deleteWebhook"))
            .json(&json!({ "drop_pending_updates": true }))
            .timeout(self.send_timeout)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        let body = res
            .json::<ApiResponse<bool>>()
            .await
            .map_err(|e| e.without_url().to_string())?;

        if !body.ok {
            return Err(format!(
                "deleteWebhook failed: {}",
                body.description.unwrap_or_default()
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DispatchFailure> {
        let res = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .timeout(self.send_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchFailure::Timeout
                } else {
                    // the url carries the token
                    DispatchFailure::Transport(e.without_url())
                }
            })?;

        let status = res.status();
        let body = res
            .json::<ApiResponse<serde_json::Value>>()
            .await
            .map_err(|e| DispatchFailure::Transport(e.without_url()))?;

        if !body.ok {
            return Err(DispatchFailure::Rejected(format!(
                "{status} {}",
                body.description.unwrap_or_default()
            )));
        }

        Ok(())
    }
}
