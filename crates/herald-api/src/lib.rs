//! Herald message delivery failures.
//!
//! Typed delivery failures (most notably [`NoListener`], raised when a message
//! reaches its target peer but no listener claims it), the routing targets
//! and messages they refer to, the wire reply that reports an unclaimed
//! delivery to the original sender, and the local listener registry that
//! detects it.

pub mod config;
pub mod errors;
pub mod listeners;
pub mod message;
pub mod target;
pub mod wire;

pub use config::{DEFAULT_LOCAL_PEER, DispatchConfig};
pub use errors::{DeliveryFailure, FailureKind, HeraldError, HeraldResult, NoListener};
pub use listeners::{
    ListenerError, ListenerId, ListenerRegistry, MessageListener, RegistryError, SharedListener,
};
pub use message::{Message, MessageReceived, MessageUid, generate_uid};
pub use target::{PeerUid, Target, TargetParseError};
pub use wire::{
    NoListenerNotice, SUBJECT_NO_LISTENER, WireError, no_listener_reply, parse_no_listener_reply,
};
