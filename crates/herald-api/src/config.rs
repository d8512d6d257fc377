use crate::target::{PeerUid, Target};

pub const DEFAULT_LOCAL_PEER: &str = "local";

/// Runtime configuration for local message dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    pub local_peer: PeerUid,
    pub notify_sender: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            local_peer: DEFAULT_LOCAL_PEER.to_string(),
            notify_sender: true,
        }
    }
}

impl DispatchConfig {
    pub fn for_peer(local_peer: impl Into<PeerUid>) -> Self {
        Self {
            local_peer: local_peer.into(),
            ..Self::default()
        }
    }

    pub fn local_target(&self) -> Target {
        Target::Peer(self.local_peer.clone())
    }
}
