//! Egress forwarder pool, refcounted sender ownership and the address route table.

use crate::api::endpoint::Endpoint;
use crate::control_plane::broker_index::BrokerIndex;
use crate::control_plane::sender_identity::SenderIdentityKey;
use crate::data_plane::egress_worker::EgressForwarder;
use crate::error::{BrokerError, Result};
use crate::message::OutboundMessage;
use crate::observability::{events, fields};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, Sender};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const COMPONENT: &str = "egress_pool";

pub(crate) type EgressForwardersContainer =
    Mutex<HashMap<SenderIdentityKey, (usize, Arc<EgressForwarder>, Sender<Arc<OutboundMessage>>)>>;

#[derive(Clone)]
pub(crate) struct EgressRoute {
    pub(crate) endpoint_name: String,
    pub(crate) address_prefix: String,
    queue: Sender<Arc<OutboundMessage>>,
}

pub(crate) struct EgressPool {
    message_queue_size: usize,
    index: Arc<BrokerIndex>,
    pub(crate) forwarders: EgressForwardersContainer,
    routes: ArcSwap<Vec<EgressRoute>>,
}

impl EgressPool {
    pub(crate) fn new(message_queue_size: usize, index: Arc<BrokerIndex>) -> Self {
        Self {
            message_queue_size,
            index,
            forwarders: Mutex::new(HashMap::new()),
            routes: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Routes `endpoint.address_prefix` to the endpoint's sender, reusing a running
    /// worker when the sender is already pooled.
    pub(crate) async fn insert(&self, endpoint: &Endpoint) -> Result<()> {
        let sender_key = SenderIdentityKey::new(endpoint.sender.clone());

        let mut egress_forwarders = self.forwarders.lock().await;

        let queue = match egress_forwarders.get_mut(&sender_key) {
            Some((active, _, queue)) => {
                *active += 1;
                queue.clone()
            }
            None => {
                let (tx, rx) = broadcast::channel(self.message_queue_size);
                let forwarder = EgressForwarder::new(sender_key.sender(), rx, self.index.clone())
                    .map_err(|err| {
                        BrokerError::Transport(format!("unable to start egress worker: {err}"))
                    })?;
                egress_forwarders.insert(sender_key, (1, Arc::new(forwarder), tx.clone()));
                tx
            }
        };
        debug!(
            event = events::EGRESS_WORKER_CREATE_OR_REUSE,
            component = COMPONENT,
            endpoint = endpoint.name.as_str(),
            pooled_workers = egress_forwarders.len(),
            "egress worker ready"
        );

        let route = EgressRoute {
            endpoint_name: endpoint.name.clone(),
            address_prefix: endpoint.address_prefix.clone(),
            queue,
        };
        self.routes.rcu(|routes| {
            let mut next = (**routes).clone();
            next.push(route.clone());
            next
        });
        debug!(
            event = events::EGRESS_ROUTE_ADDED,
            component = COMPONENT,
            endpoint = endpoint.name.as_str(),
            address_prefix = endpoint.address_prefix.as_str(),
            routes = self.route_count(),
            "egress route added"
        );
        Ok(())
    }

    pub(crate) async fn remove(&self, endpoint: &Endpoint) {
        let sender_key = SenderIdentityKey::new(endpoint.sender.clone());

        self.routes.rcu(|routes| {
            routes
                .iter()
                .filter(|route| route.address_prefix != endpoint.address_prefix)
                .cloned()
                .collect::<Vec<_>>()
        });
        debug!(
            event = events::EGRESS_ROUTE_REMOVED,
            component = COMPONENT,
            endpoint = endpoint.name.as_str(),
            address_prefix = endpoint.address_prefix.as_str(),
            routes = self.route_count(),
            "egress route removed"
        );

        let mut egress_forwarders = self.forwarders.lock().await;

        let active_num = {
            let Some((active, _, _)) = egress_forwarders.get_mut(&sender_key) else {
                warn!(
                    component = COMPONENT,
                    endpoint = endpoint.name.as_str(),
                    "no pooled worker for endpoint sender"
                );
                return;
            };

            *active -= 1;
            *active
        };

        if active_num == 0 {
            if let Some((_, forwarder, _)) = egress_forwarders.remove(&sender_key) {
                debug!(
                    event = events::EGRESS_WORKER_RELEASED,
                    component = COMPONENT,
                    worker_id = forwarder.id(),
                    "last endpoint released egress worker"
                );
            }
        }
    }

    /// Queues a message on the endpoint with the longest prefix matching its destination.
    ///
    /// Returns `false` when no endpoint serves the destination or its worker is gone.
    pub(crate) fn dispatch(&self, message: OutboundMessage) -> bool {
        let routes = self.routes.load();
        let destination = message.destination();
        let Some(route) = routes
            .iter()
            .filter(|route| destination.starts_with(&route.address_prefix))
            .max_by_key(|route| route.address_prefix.len())
        else {
            warn!(
                event = events::EGRESS_NO_ROUTE,
                component = COMPONENT,
                destination,
                kind = fields::format_outbound_kind(&message),
                "no endpoint serves destination, dropping message"
            );
            return false;
        };

        let endpoint = route.endpoint_name.as_str();
        if let Err(err) = route.queue.send(Arc::new(message)) {
            warn!(
                event = events::EGRESS_ENQUEUE_FAILED,
                component = COMPONENT,
                endpoint,
                destination = err.0.destination(),
                "egress worker not receiving, dropping message"
            );
            return false;
        }
        true
    }

    pub(crate) fn route_count(&self) -> usize {
        self.routes.load().len()
    }
}

#[cfg(test)]
mod tests {
    use super::EgressPool;
    use crate::api::endpoint::Endpoint;
    use crate::api::transport::MessageSender;
    use crate::control_plane::broker_index::BrokerIndex;
    use crate::error::Result;
    use crate::message::{InteractionStage, MessageHeader, OutboundMessage, SessionType};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct ChannelSender {
        tx: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl MessageSender for ChannelSender {
        async fn send(&self, message: Arc<OutboundMessage>) -> Result<()> {
            let _ = self.tx.send(message.destination().to_string());
            Ok(())
        }
    }

    fn ack_to(destination: &str) -> OutboundMessage {
        OutboundMessage::ack(MessageHeader {
            uri_from: "maltcp://broker".to_string(),
            uri_to: destination.to_string(),
            authentication_id: Vec::new(),
            timestamp: 0,
            interaction_stage: InteractionStage::RegisterAck,
            transaction_id: 1,
            domain: vec!["esa".to_string()],
            network_zone: "ground".to_string(),
            session: SessionType::Live,
            session_name: "LIVE".to_string(),
            area: 1,
            service: 1,
            operation: 1,
            area_version: 1,
            is_error_message: false,
        })
    }

    #[tokio::test]
    async fn endpoints_sharing_a_sender_share_one_worker() {
        let pool = EgressPool::new(8, Arc::new(BrokerIndex::new()));
        let (tx, _rx) = mpsc::unbounded_channel();
        let sender: Arc<dyn MessageSender> = Arc::new(ChannelSender { tx });

        pool.insert(&Endpoint::new("a", "maltcp://a", sender.clone()))
            .await
            .expect("insert");
        pool.insert(&Endpoint::new("b", "maltcp://b", sender.clone()))
            .await
            .expect("insert");

        {
            let forwarders = pool.forwarders.lock().await;
            assert_eq!(forwarders.len(), 1);
            let (active, _, _) = forwarders.values().next().expect("single worker");
            assert_eq!(*active, 2);
        }
        assert_eq!(pool.route_count(), 2);

        pool.remove(&Endpoint::new("a", "maltcp://a", sender.clone())).await;
        assert_eq!(pool.forwarders.lock().await.len(), 1);

        pool.remove(&Endpoint::new("b", "maltcp://b", sender)).await;
        assert!(pool.forwarders.lock().await.is_empty());
        assert_eq!(pool.route_count(), 0);
    }

    #[tokio::test]
    async fn dispatch_prefers_longest_prefix() {
        let pool = EgressPool::new(8, Arc::new(BrokerIndex::new()));
        let (generic_tx, mut generic_rx) = mpsc::unbounded_channel();
        let (specific_tx, mut specific_rx) = mpsc::unbounded_channel();

        pool.insert(&Endpoint::new(
            "generic",
            "maltcp://",
            Arc::new(ChannelSender { tx: generic_tx }),
        ))
        .await
        .expect("insert");
        pool.insert(&Endpoint::new(
            "ground",
            "maltcp://ground/",
            Arc::new(ChannelSender { tx: specific_tx }),
        ))
        .await
        .expect("insert");

        assert!(pool.dispatch(ack_to("maltcp://ground/consumer")));
        assert!(pool.dispatch(ack_to("maltcp://space/consumer")));
        assert!(!pool.dispatch(ack_to("malhttp://elsewhere")));

        let specific = tokio::time::timeout(Duration::from_secs(2), specific_rx.recv())
            .await
            .expect("delivered in time");
        let generic = tokio::time::timeout(Duration::from_secs(2), generic_rx.recv())
            .await
            .expect("delivered in time");
        assert_eq!(specific.as_deref(), Some("maltcp://ground/consumer"));
        assert_eq!(generic.as_deref(), Some("maltcp://space/consumer"));
    }
}
