//! Agent and uploaded-file types.

use serde::{Deserialize, Serialize};

use super::message::Message;

/// An agent as held client-side: directory metadata plus the conversation
/// history owned by it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agent {
    /// Server-assigned id. Creation responses from older backend builds use
    /// `agent_id`; both spellings decode.
    #[serde(alias = "agent_id")]
    pub id: i64,
    pub name: String,
    pub prompt: String,
    #[serde(default)]
    pub files: Vec<FileInfo>,
    /// Ordered oldest-first. The backend serializes this as `chatHistory`.
    #[serde(rename = "chatHistory", default)]
    pub chat_history: Vec<Message>,
}

impl Agent {
    /// Create an agent with an empty file set and history.
    pub fn new(id: i64, name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            prompt: prompt.into(),
            files: Vec::new(),
            chat_history: Vec::new(),
        }
    }
}

/// A file uploaded to an agent. Content lives server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    pub id: i64,
    pub name: String,
}
