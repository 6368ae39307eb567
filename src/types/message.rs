//! Chat message types.

use serde::{Deserialize, Serialize};

/// A single message in a conversation.
///
/// Immutable once fully received; during an in-flight streamed response the
/// last bot message is the only one updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        let json = serde_json::to_string(&Message::bot("hi")).unwrap();
        assert_eq!(json, r#"{"sender":"bot","text":"hi"}"#);
    }

    #[test]
    fn server_payload_with_id_field_decodes() {
        // The backend includes a row id on persisted messages; the client
        // model carries only sender and text.
        let msg: Message =
            serde_json::from_str(r#"{"id":42,"sender":"user","text":"hello"}"#).unwrap();
        assert_eq!(msg, Message::user("hello"));
    }
}
