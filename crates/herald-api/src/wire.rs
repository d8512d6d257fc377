//! Wire form of an unclaimed delivery, sent back to the original sender.

use crate::errors::NoListener;
use crate::message::{Message, MessageReceived, MessageUid};
use crate::target::Target;
use serde::{Deserialize, Serialize};

pub const SUBJECT_NO_LISTENER: &str = "herald/error/no-listener";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoListenerNotice {
    pub uid: MessageUid,
    pub subject: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("unexpected subject for no-listener reply: {0}")]
    UnexpectedSubject(String),

    #[error("malformed no-listener content: {0}")]
    MalformedContent(#[from] serde_json::Error),

    #[error("failed to encode no-listener content: {0}")]
    Encode(serde_json::Error),
}

impl NoListener {
    pub fn notice(&self) -> NoListenerNotice {
        NoListenerNotice {
            uid: self.uid().to_string(),
            subject: self.subject().to_string(),
        }
    }
}

/// Builds the reply telling the original sender that nobody claimed its message.
pub fn no_listener_reply(error: &NoListener) -> Result<Message, WireError> {
    let content = serde_json::to_value(error.notice()).map_err(WireError::Encode)?;
    Ok(Message::reply(error.uid(), SUBJECT_NO_LISTENER, content))
}

/// Rebuilds the failure from a reply received from the peer that dropped the message.
pub fn parse_no_listener_reply(reply: &MessageReceived) -> Result<NoListener, WireError> {
    if reply.subject() != SUBJECT_NO_LISTENER {
        return Err(WireError::UnexpectedSubject(reply.subject().to_string()));
    }
    let notice: NoListenerNotice = serde_json::from_value(reply.content().clone())?;
    Ok(NoListener::new(
        Target::Peer(reply.sender.clone()),
        notice.uid,
        notice.subject,
    ))
}
