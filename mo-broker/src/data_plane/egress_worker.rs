//! Egress worker that forwards queued outbound messages on one sender.

use crate::api::transport::MessageSender;
use crate::control_plane::broker_index::BrokerIndex;
use crate::error::BrokerError;
use crate::message::OutboundMessage;
use crate::observability::{events, fields};
use crate::runtime::worker_runtime::spawn_message_forwarding_loop;
use std::io;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMPONENT: &str = "egress_worker";

pub(crate) struct EgressForwarder {
    id: String,
}

impl EgressForwarder {
    pub(crate) fn new(
        sender: Arc<dyn MessageSender>,
        message_receiver: Receiver<Arc<OutboundMessage>>,
        index: Arc<BrokerIndex>,
    ) -> io::Result<Self> {
        let id = Uuid::new_v4().hyphenated().to_string();
        let worker_id = id.clone();

        spawn_message_forwarding_loop(
            format!("egress-{}", &id[..8]),
            sender,
            message_receiver.resubscribe(),
            move |sender, message_receiver| async move {
                Self::message_forwarding_loop(worker_id.clone(), sender, message_receiver, index)
                    .await;
                info!(
                    event = events::EGRESS_WORKER_STOPPED,
                    component = COMPONENT,
                    worker_id = worker_id.as_str(),
                    "egress queue closed, worker exiting"
                );
            },
        )?;

        Ok(Self { id })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) async fn message_forwarding_loop(
        worker_id: String,
        sender: Arc<dyn MessageSender>,
        mut message_receiver: Receiver<Arc<OutboundMessage>>,
        index: Arc<BrokerIndex>,
    ) {
        loop {
            match message_receiver.recv().await {
                Ok(message) => Self::forward(&worker_id, sender.as_ref(), &index, message).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        event = events::EGRESS_WORKER_LAGGED,
                        component = COMPONENT,
                        worker_id = worker_id.as_str(),
                        skipped,
                        "egress queue overflowed, messages dropped"
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn forward(
        worker_id: &str,
        sender: &dyn MessageSender,
        index: &BrokerIndex,
        message: Arc<OutboundMessage>,
    ) {
        debug!(
            event = events::EGRESS_SEND_ATTEMPT,
            component = COMPONENT,
            worker_id,
            destination = message.destination(),
            kind = fields::format_outbound_kind(&message),
            updates = fields::count_updates(&message),
            "attempting send"
        );

        match sender.send(message.clone()).await {
            Ok(()) => {
                debug!(
                    event = events::EGRESS_SEND_OK,
                    component = COMPONENT,
                    worker_id,
                    destination = message.destination(),
                    "send succeeded"
                );
            }
            Err(err @ BrokerError::ConsumerUnreachable { .. }) => {
                warn!(
                    event = events::EGRESS_SEND_FAILED,
                    component = COMPONENT,
                    worker_id,
                    destination = message.destination(),
                    err = %err,
                    "consumer unreachable, dropping its subscriptions for this topic"
                );
                if let Err(err) = index.remove_lost_consumer(&message.header) {
                    warn!(
                        event = events::EGRESS_SEND_FAILED,
                        component = COMPONENT,
                        worker_id,
                        err = %err,
                        "unable to remove lost consumer"
                    );
                }
            }
            Err(err) => {
                warn!(
                    event = events::EGRESS_SEND_FAILED,
                    component = COMPONENT,
                    worker_id,
                    destination = message.destination(),
                    err = %err,
                    "send failed"
                );
            }
        }
    }
}
