//! Conversation endpoints: history fetch and message send.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::Message;

use super::http::status_to_error;
use super::ApiClient;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    text: String,
}

impl ApiClient {
    /// Fetch an agent's full conversation, oldest first.
    pub async fn fetch_conversation(&self, agent_id: i64) -> Result<Vec<Message>> {
        let resp = self
            .authorized(
                self.http()
                    .get(self.url(&format!("/api/agents/{agent_id}/messages"))),
            )
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    /// Send a user message; the response body carries the bot reply text.
    pub async fn send_message(&self, agent_id: i64, text: &str) -> Result<String> {
        debug!(agent_id, "send message");
        let resp = self
            .authorized(
                self.http()
                    .post(self.url(&format!("/api/agents/{agent_id}/messages"))),
            )
            .json(&SendMessageRequest { text })
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let data: SendMessageResponse = resp.json().await?;
        Ok(data.text)
    }
}
