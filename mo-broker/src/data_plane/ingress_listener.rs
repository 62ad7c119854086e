//! Ingress listener that applies decoded inbound requests to the broker index.

use crate::api::transport::MessageListener;
use crate::config::BrokerConfig;
use crate::control_plane::broker_index::BrokerIndex;
use crate::data_plane::egress_pool::EgressPool;
use crate::error::BrokerError;
use crate::message::{
    InboundBody, InboundMessage, InteractionStage, MessageHeader, OutboundMessage, PublishedUpdate,
};
use crate::observability::{events, fields};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "ingress_listener";

pub(crate) struct BrokerListener {
    broker_uri: String,
    enforce_publisher_registration: bool,
    acknowledge_requests: bool,
    index: Arc<BrokerIndex>,
    egress: Arc<EgressPool>,
}

impl BrokerListener {
    pub(crate) fn new(
        config: &BrokerConfig,
        index: Arc<BrokerIndex>,
        egress: Arc<EgressPool>,
    ) -> Self {
        Self {
            broker_uri: config.broker_uri.clone(),
            enforce_publisher_registration: config.enforce_publisher_registration,
            acknowledge_requests: config.acknowledge_requests,
            index,
            egress,
        }
    }

    /// Applies one request and returns the outbound messages it produced.
    pub(crate) fn handle(&self, message: InboundMessage) -> Vec<OutboundMessage> {
        let InboundMessage { header, body } = message;
        let stage = body.stage();

        let outcome = match body {
            InboundBody::Register { subscription } => self.index.register(
                &header,
                &subscription.subscription_id,
                &subscription.entity_requests,
            ),
            InboundBody::Deregister { subscription_ids } => {
                self.index.deregister(&header, &subscription_ids)
            }
            InboundBody::PublishRegister { keys } => self.index.publish_register(&header, &keys),
            InboundBody::PublishDeregister => self.index.publish_deregister(&header),
            InboundBody::Publish { updates } => return self.handle_publish(&header, &updates),
        };

        match outcome {
            Ok(()) if self.acknowledge_requests => {
                self.reply(&header, stage).map(OutboundMessage::ack).into_iter().collect()
            }
            Ok(()) => Vec::new(),
            Err(err) => self.reject(&header, stage, &err).into_iter().collect(),
        }
    }

    fn handle_publish(
        &self,
        header: &MessageHeader,
        updates: &[PublishedUpdate],
    ) -> Vec<OutboundMessage> {
        let checked = if self.enforce_publisher_registration {
            self.index.check_publish(header, updates)
        } else {
            Ok(())
        };

        match checked.and_then(|()| self.index.create_notify(header, updates)) {
            Ok(notifies) => notifies,
            Err(err) => {
                warn!(
                    event = events::PUBLISH_REJECTED,
                    component = COMPONENT,
                    publisher = header.uri_from.as_str(),
                    domain = %fields::format_domain(header),
                    updates = updates.len(),
                    err = %err,
                    "rejecting publish"
                );
                self.reject(header, InteractionStage::Publish, &err)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn reply(&self, header: &MessageHeader, stage: InteractionStage) -> Option<MessageHeader> {
        let ack_stage = stage.ack()?;
        if header.uri_from.is_empty() {
            debug!(
                event = events::INGRESS_REPLY_SKIPPED,
                component = COMPONENT,
                stage = %stage,
                "request carries no sender address, not replying"
            );
            return None;
        }
        Some(header.reply(ack_stage, &self.broker_uri))
    }

    fn reject(
        &self,
        header: &MessageHeader,
        stage: InteractionStage,
        err: &BrokerError,
    ) -> Option<OutboundMessage> {
        warn!(
            event = events::REQUEST_REJECTED,
            component = COMPONENT,
            stage = %stage,
            requester = header.uri_from.as_str(),
            code = err.code(),
            err = %err,
            "request rejected"
        );
        self.reply(header, stage)
            .map(|reply| OutboundMessage::error(reply, err.code(), err.to_string()))
    }

    /// Applies one request and queues its replies and notifies on the egress pool.
    ///
    /// Returns how many outbound messages were queued.
    pub(crate) fn receive(&self, message: InboundMessage) -> usize {
        debug!(
            event = events::INGRESS_RECEIVE,
            component = COMPONENT,
            stage = %message.body.stage(),
            from = message.header.uri_from.as_str(),
            transaction_id = message.header.transaction_id,
            "received inbound message"
        );

        let outbound = self.handle(message);
        let produced = outbound.len();
        let queued = outbound
            .into_iter()
            .map(|message| self.egress.dispatch(message))
            .filter(|queued| *queued)
            .count();
        if queued < produced {
            warn!(
                component = COMPONENT,
                produced,
                queued,
                "some outbound messages had no egress route"
            );
        }
        queued
    }
}

#[async_trait]
impl MessageListener for BrokerListener {
    async fn on_receive(&self, message: InboundMessage) {
        self.receive(message);
    }
}
