use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type PeerUid = String;

const GROUP_PREFIX: &str = "group:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetParseError {
    #[error("target must not be empty")]
    Empty,
    #[error("group target must name a group")]
    EmptyGroup,
    #[error("peer list contains an empty uid")]
    EmptyPeer,
}

/// Routing target of a Herald message: one peer, a named group, or an explicit
/// list of peers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Target {
    Peer(PeerUid),
    Group(String),
    Peers(Vec<PeerUid>),
}

impl Target {
    pub fn peer(uid: impl Into<PeerUid>) -> Self {
        Self::Peer(uid.into())
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    pub fn peers<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PeerUid>,
    {
        Self::Peers(uids.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Target {
    fn from(uid: &str) -> Self {
        Self::Peer(uid.to_string())
    }
}

impl From<String> for Target {
    fn from(uid: String) -> Self {
        Self::Peer(uid)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Peer(uid) => f.write_str(uid),
            Target::Group(name) => write!(f, "{GROUP_PREFIX}{name}"),
            Target::Peers(uids) => f.write_str(&uids.join(",")),
        }
    }
}

/// Parses the `Display` form: `group:<name>`, a comma-separated peer list, or
/// a single peer UID.
impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TargetParseError::Empty);
        }
        if let Some(name) = value.strip_prefix(GROUP_PREFIX) {
            let name = name.trim();
            if name.is_empty() {
                return Err(TargetParseError::EmptyGroup);
            }
            return Ok(Self::group(name));
        }
        if value.contains(',') {
            let uids: Vec<&str> = value.split(',').map(str::trim).collect();
            if uids.iter().any(|uid| uid.is_empty()) {
                return Err(TargetParseError::EmptyPeer);
            }
            return Ok(Self::peers(uids));
        }
        Ok(Self::peer(value))
    }
}
