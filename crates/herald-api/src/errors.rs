//! Delivery failure taxonomy.
//!
//! Every failure kind carries the routing [`Target`] it concerns and a
//! human-readable description, exposed through [`DeliveryFailure`].
//! [`HeraldError`] is the closed set of kinds callers match on.

use crate::message::MessageUid;
use crate::target::Target;
use thiserror::Error;

const NO_LISTENER_PREFIX: &str = "No listener for ";

/// Capabilities shared by every delivery failure.
pub trait DeliveryFailure: std::error::Error + Send + Sync {
    fn target(&self) -> &Target;

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// The message reached its target peer, but no listener claimed it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NoListener {
    target: Target,
    uid: MessageUid,
    subject: String,
    message: String,
}

impl NoListener {
    pub fn new(target: Target, uid: impl Into<MessageUid>, subject: impl Into<String>) -> Self {
        let uid = uid.into();
        let message = format!("{NO_LISTENER_PREFIX}{uid}");
        Self {
            target,
            uid,
            subject: subject.into(),
            message,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// UID of the unclaimed message.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl DeliveryFailure for NoListener {
    fn target(&self) -> &Target {
        &self.target
    }

    fn describe(&self) -> String {
        self.message.clone()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NoListener,
    NoTransport,
    InvalidPeerAccess,
    Timeout,
    ForgotMessage,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::NoListener => "no_listener",
            FailureKind::NoTransport => "no_transport",
            FailureKind::InvalidPeerAccess => "invalid_peer_access",
            FailureKind::Timeout => "timeout",
            FailureKind::ForgotMessage => "forgot_message",
        }
    }
}

/// Top-level delivery failure for Herald messages.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HeraldError {
    #[error(transparent)]
    NoListener(#[from] NoListener),
    #[error("{text}")]
    NoTransport { target: Target, text: String },
    #[error("{text}")]
    InvalidPeerAccess { target: Target, text: String },
    #[error("{text}")]
    Timeout {
        target: Target,
        uid: MessageUid,
        text: String,
    },
    #[error("Forgot message {uid}")]
    ForgotMessage { target: Target, uid: MessageUid },
}

pub type HeraldResult<T> = Result<T, HeraldError>;

impl HeraldError {
    pub fn no_transport(target: Target, text: impl Into<String>) -> Self {
        Self::NoTransport {
            target,
            text: text.into(),
        }
    }

    pub fn invalid_peer_access(target: Target, text: impl Into<String>) -> Self {
        Self::InvalidPeerAccess {
            target,
            text: text.into(),
        }
    }

    pub fn timeout(target: Target, uid: impl Into<MessageUid>, text: impl Into<String>) -> Self {
        Self::Timeout {
            target,
            uid: uid.into(),
            text: text.into(),
        }
    }

    pub fn forgot_message(target: Target, uid: impl Into<MessageUid>) -> Self {
        Self::ForgotMessage {
            target,
            uid: uid.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            HeraldError::NoListener(_) => FailureKind::NoListener,
            HeraldError::NoTransport { .. } => FailureKind::NoTransport,
            HeraldError::InvalidPeerAccess { .. } => FailureKind::InvalidPeerAccess,
            HeraldError::Timeout { .. } => FailureKind::Timeout,
            HeraldError::ForgotMessage { .. } => FailureKind::ForgotMessage,
        }
    }

    pub fn as_no_listener(&self) -> Option<&NoListener> {
        match self {
            HeraldError::NoListener(error) => Some(error),
            _ => None,
        }
    }
}

impl DeliveryFailure for HeraldError {
    fn target(&self) -> &Target {
        match self {
            HeraldError::NoListener(error) => error.target(),
            HeraldError::NoTransport { target, .. }
            | HeraldError::InvalidPeerAccess { target, .. }
            | HeraldError::Timeout { target, .. }
            | HeraldError::ForgotMessage { target, .. } => target,
        }
    }
}
