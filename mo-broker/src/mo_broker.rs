/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::api::endpoint::Endpoint;
use crate::api::transport::MessageListener;
use crate::config::BrokerConfig;
use crate::control_plane::broker_index::BrokerIndex;
use crate::control_plane::endpoint_lifecycle::{
    insert_endpoint_rule, remove_endpoint_rule, EndpointRules,
};
use crate::control_plane::endpoint_table::build_endpoint_rule;
use crate::control_plane::report::BrokerReport;
use crate::data_plane::egress_pool::EgressPool;
use crate::data_plane::ingress_listener::BrokerListener;
use crate::error::{BrokerError, Result};
use crate::message::{
    EntityRequest, InboundMessage, MessageHeader, OutboundMessage, PublishedUpdate,
};
use crate::observability::events;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

const COMPONENT: &str = "mo_broker";

/// Broker facade: the subscription index plus the transport plumbing around it.
///
/// Synchronous index operations are exposed directly; endpoint management is
/// async because it touches the egress worker pool.
pub struct MoBroker {
    name: String,
    config: BrokerConfig,
    index: Arc<BrokerIndex>,
    egress: Arc<EgressPool>,
    listener: Arc<BrokerListener>,
    registered_endpoint_rules: EndpointRules,
}

impl MoBroker {
    pub fn new(config: BrokerConfig) -> Result<Self> {
        config.validate()?;

        let index = Arc::new(BrokerIndex::new());
        let egress = Arc::new(EgressPool::new(
            config.message_queue_size as usize,
            index.clone(),
        ));
        let listener = Arc::new(BrokerListener::new(&config, index.clone(), egress.clone()));

        info!(
            event = events::BROKER_CREATED,
            component = COMPONENT,
            name = config.name.as_str(),
            broker_uri = config.broker_uri.as_str(),
            message_queue_size = config.message_queue_size,
            enforce_publisher_registration = config.enforce_publisher_registration,
            "broker created"
        );

        Ok(Self {
            name: config.name.clone(),
            config,
            index,
            egress,
            listener,
            registered_endpoint_rules: Mutex::new(HashSet::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Shared handle on the subscription index.
    pub fn index(&self) -> Arc<BrokerIndex> {
        self.index.clone()
    }

    /// Listener a transport feeds decoded inbound messages into.
    pub fn listener(&self) -> Arc<dyn MessageListener> {
        self.listener.clone()
    }

    /// Applies one inbound request and queues whatever it produced on the endpoints.
    ///
    /// Same path as [`MessageListener::on_receive`], but returns how many acks,
    /// error replies and notifies were queued so a caller can wait for delivery.
    pub fn receive(&self, message: InboundMessage) -> usize {
        self.listener.receive(message)
    }

    #[inline(always)]
    fn endpoint_id(endpoint: &Endpoint) -> String {
        format!(
            "[name: {}, address_prefix: {:?}]",
            endpoint.name, endpoint.address_prefix
        )
    }

    #[inline(always)]
    fn fail_due_to_empty_prefix(&self, endpoint: &Endpoint) -> Result<()> {
        let err = BrokerError::invalid_argument(format!(
            "{} has an empty address prefix",
            Self::endpoint_id(endpoint)
        ));
        error!(
            component = COMPONENT,
            name = self.name.as_str(),
            err = %err,
            "endpoint rejected"
        );
        Err(err)
    }

    /// Starts delivering messages addressed under `endpoint.address_prefix`.
    pub async fn add_endpoint(&self, endpoint: Endpoint) -> Result<()> {
        debug!(
            component = COMPONENT,
            name = self.name.as_str(),
            endpoint = %Self::endpoint_id(&endpoint),
            "adding endpoint"
        );

        if endpoint.address_prefix.is_empty() {
            return self.fail_due_to_empty_prefix(&endpoint);
        }

        let endpoint_rule = build_endpoint_rule(&endpoint);
        let inserted =
            insert_endpoint_rule(&self.registered_endpoint_rules, endpoint_rule.clone()).await;
        if !inserted {
            return Err(BrokerError::AlreadyExists(Self::endpoint_id(&endpoint)));
        }

        if let Err(err) = self.egress.insert(&endpoint).await {
            remove_endpoint_rule(&self.registered_endpoint_rules, &endpoint_rule).await;
            return Err(err);
        }

        Ok(())
    }

    pub async fn delete_endpoint(&self, endpoint: Endpoint) -> Result<()> {
        debug!(
            component = COMPONENT,
            name = self.name.as_str(),
            endpoint = %Self::endpoint_id(&endpoint),
            "deleting endpoint"
        );

        if endpoint.address_prefix.is_empty() {
            return self.fail_due_to_empty_prefix(&endpoint);
        }

        let endpoint_rule = build_endpoint_rule(&endpoint);
        let removed = remove_endpoint_rule(&self.registered_endpoint_rules, &endpoint_rule).await;
        if !removed {
            return Err(BrokerError::NotFound(Self::endpoint_id(&endpoint)));
        }

        self.egress.remove(&endpoint).await;
        Ok(())
    }

    pub fn register(
        &self,
        header: &MessageHeader,
        subscription_id: &str,
        entity_requests: &[EntityRequest],
    ) -> Result<()> {
        self.index.register(header, subscription_id, entity_requests)
    }

    pub fn deregister<S: AsRef<str>>(
        &self,
        header: &MessageHeader,
        subscription_ids: &[S],
    ) -> Result<()> {
        self.index.deregister(header, subscription_ids)
    }

    pub fn remove_lost_consumer(&self, header: &MessageHeader) -> Result<()> {
        self.index.remove_lost_consumer(header)
    }

    pub fn create_notify(
        &self,
        header: &MessageHeader,
        updates: &[PublishedUpdate],
    ) -> Result<Vec<OutboundMessage>> {
        self.index.create_notify(header, updates)
    }

    /// Builds the notifies for one published batch and queues them on the endpoints.
    ///
    /// Returns how many notifies were queued. Notifies addressed to consumers no
    /// endpoint serves are dropped.
    pub fn publish(&self, header: &MessageHeader, updates: &[PublishedUpdate]) -> Result<usize> {
        if self.config.enforce_publisher_registration {
            self.index.check_publish(header, updates)?;
        }

        let notifies = self.index.create_notify(header, updates)?;
        Ok(notifies
            .into_iter()
            .map(|notify| self.egress.dispatch(notify))
            .filter(|queued| *queued)
            .count())
    }

    pub fn snapshot(&self) -> BrokerReport {
        self.index.snapshot()
    }

    pub fn report(&self) -> String {
        self.index.report()
    }
}
