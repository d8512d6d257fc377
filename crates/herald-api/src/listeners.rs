use crate::config::DispatchConfig;
use crate::errors::{HeraldError, HeraldResult, NoListener};
use crate::message::{Message, MessageReceived};
use crate::wire::no_listener_reply;
use async_trait::async_trait;
use glob::Pattern;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid subject filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("listener registered without subject filters")]
    NoFilters,
}

/// Handler invoked for every received message whose subject matches one of
/// its registered filters.
#[async_trait]
pub trait MessageListener: Send + Sync {
    async fn herald_message(&self, message: &MessageReceived) -> Result<(), ListenerError>;
}

pub type SharedListener = Arc<dyn MessageListener>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    filters: Vec<Pattern>,
    listener: SharedListener,
}

impl Registration {
    fn matches(&self, subject: &str) -> bool {
        self.filters.iter().any(|filter| filter.matches(subject))
    }
}

pub struct ListenerRegistry {
    config: DispatchConfig,
    registrations: Vec<Registration>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            registrations: Vec::new(),
            next_id: 1,
        }
    }

    pub fn register<I, S>(
        &mut self,
        filters: I,
        listener: SharedListener,
    ) -> Result<ListenerId, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters = filters
            .into_iter()
            .map(|filter| {
                let filter = filter.as_ref();
                Pattern::new(filter).map_err(|error| RegistryError::InvalidFilter {
                    filter: filter.to_string(),
                    reason: error.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if filters.is_empty() {
            return Err(RegistryError::NoFilters);
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            filters,
            listener,
        });
        Ok(id)
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|registration| registration.id != id);
        self.registrations.len() != before
    }

    pub fn listeners_for(&self, subject: &str) -> Vec<ListenerId> {
        self.registrations
            .iter()
            .filter(|registration| registration.matches(subject))
            .map(|registration| registration.id)
            .collect()
    }

    /// Hands the message to every matching listener, in registration order.
    ///
    /// Returns the number of listeners that claimed it, or `NoListener` when
    /// none matched its subject.
    pub async fn deliver(&self, message: &MessageReceived) -> HeraldResult<usize> {
        let mut claimed = 0;
        for registration in &self.registrations {
            if !registration.matches(message.subject()) {
                continue;
            }
            claimed += 1;
            tracing::debug!(
                listener = ?registration.id,
                uid = message.uid(),
                subject = message.subject(),
                "delivering message to listener"
            );
            if let Err(error) = registration.listener.herald_message(message).await {
                tracing::warn!(
                    listener = ?registration.id,
                    uid = message.uid(),
                    %error,
                    "listener failed to handle message"
                );
            }
        }

        if claimed == 0 {
            return Err(HeraldError::NoListener(NoListener::new(
                self.config.local_target(),
                message.uid(),
                message.subject(),
            )));
        }
        tracing::debug!(uid = message.uid(), claimed, "message delivered");
        Ok(claimed)
    }

    /// Delivers the message and returns the reply owed to its sender, if any.
    pub async fn handle(&self, message: &MessageReceived) -> Option<Message> {
        match self.deliver(message).await {
            Ok(_) => None,
            Err(HeraldError::NoListener(error)) => {
                tracing::warn!(
                    peer = %error.target(),
                    uid = error.uid(),
                    subject = error.subject(),
                    sender = %message.sender,
                    "{}",
                    error
                );
                if !self.config.notify_sender {
                    return None;
                }
                match no_listener_reply(&error) {
                    Ok(reply) => Some(reply),
                    Err(error) => {
                        tracing::warn!(%error, "failed to build no-listener reply");
                        None
                    }
                }
            }
            Err(error) => {
                tracing::warn!(kind = error.kind().as_str(), %error, "delivery failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use crate::wire::SUBJECT_NO_LISTENER;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingListener {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageListener for RecordingListener {
        async fn herald_message(&self, message: &MessageReceived) -> Result<(), ListenerError> {
            self.seen
                .lock()
                .expect("recording listener mutex poisoned")
                .push(message.subject().to_string());
            Ok(())
        }
    }

    fn received(subject: &str) -> MessageReceived {
        MessageReceived::new(Message::new(subject, serde_json::Value::Null), "peer-1", "http")
    }

    #[test]
    fn register_invalid_filter_expected_error() {
        let mut registry = ListenerRegistry::new(DispatchConfig::default());
        let error = registry
            .register(["herald/[rpc"], Arc::new(RecordingListener::default()))
            .expect_err("filter should be rejected");

        assert!(matches!(
            error,
            RegistryError::InvalidFilter { ref filter, .. } if filter == "herald/[rpc"
        ));
    }

    #[test]
    fn register_without_filters_expected_error() {
        let mut registry = ListenerRegistry::new(DispatchConfig::default());
        let error = registry
            .register(Vec::<String>::new(), Arc::new(RecordingListener::default()))
            .expect_err("empty filters should be rejected");

        assert!(matches!(error, RegistryError::NoFilters));
    }

    #[test]
    fn listeners_for_glob_filter_expected_matching_ids_only() {
        let mut registry = ListenerRegistry::new(DispatchConfig::default());
        let rpc = registry
            .register(["herald/rpc/*"], Arc::new(RecordingListener::default()))
            .expect("register should succeed");
        let ping = registry
            .register(["ping", "pong"], Arc::new(RecordingListener::default()))
            .expect("register should succeed");

        assert_eq!(registry.listeners_for("herald/rpc/xmlrpc"), vec![rpc]);
        assert_eq!(registry.listeners_for("pong"), vec![ping]);
        assert!(registry.listeners_for("other").is_empty());
    }

    #[test]
    fn unregister_known_id_expected_removed_once() {
        let mut registry = ListenerRegistry::new(DispatchConfig::default());
        let id = registry
            .register(["ping"], Arc::new(RecordingListener::default()))
            .expect("register should succeed");

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.listeners_for("ping").is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn deliver_without_match_expected_no_listener_for_local_peer() {
        let registry = ListenerRegistry::new(DispatchConfig::for_peer("peer-42"));
        let message = received("ping");

        let error = registry
            .deliver(&message)
            .await
            .expect_err("delivery should be unclaimed");

        let error = error.as_no_listener().expect("error should be NoListener");
        assert_eq!(error.target(), &Target::peer("peer-42"));
        assert_eq!(error.uid(), message.uid());
        assert_eq!(error.subject(), "ping");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn handle_unclaimed_without_notify_expected_no_reply() {
        let registry = ListenerRegistry::new(DispatchConfig {
            notify_sender: false,
            ..DispatchConfig::default()
        });

        assert!(registry.handle(&received("ping")).await.is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn handle_unclaimed_with_notify_expected_no_listener_reply() {
        let registry = ListenerRegistry::new(DispatchConfig::default());
        let message = received("ping");

        let reply = registry
            .handle(&message)
            .await
            .expect("a reply should be produced");

        assert_eq!(reply.subject, SUBJECT_NO_LISTENER);
        assert_eq!(reply.reply_to.as_deref(), Some(message.uid()));
    }
}
