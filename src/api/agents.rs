//! Agent directory endpoints.

use reqwest::multipart;
use tracing::debug;

use crate::error::Result;
use crate::types::Agent;

use super::http::status_to_error;
use super::ApiClient;

/// A file payload for agent creation or update.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

fn agent_form(name: &str, prompt: &str, files: &[FileUpload]) -> multipart::Form {
    let mut form = multipart::Form::new()
        .text("name", name.to_string())
        .text("prompt", prompt.to_string());
    for file in files {
        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        form = form.part("files", part);
    }
    form
}

impl ApiClient {
    /// Fetch the full agent directory.
    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        let resp = self
            .authorized(self.http().get(self.url("/api/agents")))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    /// Create an agent, uploading its initial files.
    pub async fn create_agent(
        &self,
        name: &str,
        prompt: &str,
        files: &[FileUpload],
    ) -> Result<Agent> {
        debug!(name, file_count = files.len(), "create agent");
        let resp = self
            .authorized(self.http().post(self.url("/api/agents")))
            .multipart(agent_form(name, prompt, files))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    /// Update an agent's name, prompt, and file set.
    pub async fn update_agent(
        &self,
        agent_id: i64,
        name: &str,
        prompt: &str,
        files: &[FileUpload],
    ) -> Result<Agent> {
        debug!(agent_id, name, "update agent");
        let resp = self
            .authorized(
                self.http()
                    .put(self.url(&format!("/api/agents/{agent_id}"))),
            )
            .multipart(agent_form(name, prompt, files))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    /// Delete an agent and its server-side storage.
    pub async fn delete_agent(&self, agent_id: i64) -> Result<()> {
        debug!(agent_id, "delete agent");
        let resp = self
            .authorized(
                self.http()
                    .delete(self.url(&format!("/api/agents/{agent_id}"))),
            )
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }
}
