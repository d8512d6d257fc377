use crate::target::PeerUid;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type MessageUid = String;

/// Returns a fresh message UID: 32 uppercase hexadecimal characters.
pub fn generate_uid() -> MessageUid {
    uuid::Uuid::new_v4().simple().to_string().to_uppercase()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub uid: MessageUid,
    pub subject: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageUid>,
}

impl Message {
    pub fn new(subject: impl Into<String>, content: Value) -> Self {
        Self {
            uid: generate_uid(),
            subject: subject.into(),
            content,
            reply_to: None,
        }
    }

    pub fn reply(original: &str, subject: impl Into<String>, content: Value) -> Self {
        Self {
            reply_to: Some(original.to_string()),
            ..Self::new(subject, content)
        }
    }
}

/// A message as handed to the local peer by a transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageReceived {
    pub message: Message,
    pub sender: PeerUid,
    pub access: String,
}

impl MessageReceived {
    pub fn new(message: Message, sender: impl Into<PeerUid>, access: impl Into<String>) -> Self {
        Self {
            message,
            sender: sender.into(),
            access: access.into(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.message.uid
    }

    pub fn subject(&self) -> &str {
        &self.message.subject
    }

    pub fn content(&self) -> &Value {
        &self.message.content
    }
}
