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

//! # mo-broker
//!
//! `mo-broker` is the subscription-matching and notify fan-out core of a
//! publish/subscribe broker. Consumers register subscriptions made of entity keys
//! (with wildcards) under a topic signature; publishers send batches of updates;
//! the broker computes, per consumer, the notify message carrying exactly the
//! updates each subscription asked for.
//!
//! Typical usage is API-first and centered on [`MoBroker`], with [`Endpoint`]s
//! binding consumer address ranges to a [`MessageSender`].
//!
//! ## Subscription matching
//!
//! ```
//! use mo_broker::{
//!     BrokerConfig, EntityKey, EntityRequest, InteractionStage, MessageHeader, MoBroker,
//!     PublishedUpdate, SessionType, UpdateType,
//! };
//!
//! fn header(from: &str) -> MessageHeader {
//!     MessageHeader {
//!         uri_from: from.to_string(),
//!         uri_to: "maltcp://localhost/broker".to_string(),
//!         authentication_id: Vec::new(),
//!         timestamp: 0,
//!         interaction_stage: InteractionStage::Register,
//!         transaction_id: 1,
//!         domain: vec!["esa".to_string(), "mission".to_string()],
//!         network_zone: "ground".to_string(),
//!         session: SessionType::Live,
//!         session_name: "LIVE".to_string(),
//!         area: 4,
//!         service: 6,
//!         operation: 1,
//!         area_version: 1,
//!         is_error_message: false,
//!     }
//! }
//!
//! let broker = MoBroker::new(BrokerConfig::default()).unwrap();
//! let temp = EntityKey::new(Some("temp"), None, None, None);
//! broker
//!     .register(&header("maltcp://consumer-a"), "S1", &[EntityRequest::on_all([temp])])
//!     .unwrap();
//!
//! let updates = [
//!     PublishedUpdate::new(
//!         EntityKey::new(Some("temp"), Some(1), Some(2), Some(3)),
//!         UpdateType::PlainUpdate,
//!         b"21.5".to_vec(),
//!     ),
//!     PublishedUpdate::new(
//!         EntityKey::new(Some("pressure"), Some(1), Some(2), Some(3)),
//!         UpdateType::PlainUpdate,
//!         b"1013".to_vec(),
//!     ),
//! ];
//! let notifies = broker.create_notify(&header("maltcp://publisher"), &updates).unwrap();
//!
//! assert_eq!(notifies.len(), 1);
//! assert_eq!(notifies[0].destination(), "maltcp://consumer-a");
//! let entry = notifies[0].entry("S1").unwrap();
//! assert_eq!(entry.updates.len(), 1);
//! assert_eq!(entry.updates[0].key, updates[0].key);
//! ```
//!
//! ## Endpoint contract
//!
//! Empty prefixes are rejected, duplicate inserts fail, and deleting a missing
//! endpoint returns an error.
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mo_broker::{BrokerConfig, Endpoint, MessageSender, MoBroker, OutboundMessage, Result};
//!
//! struct Discard;
//!
//! #[async_trait]
//! impl MessageSender for Discard {
//!     async fn send(&self, _message: Arc<OutboundMessage>) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let broker = MoBroker::new(BrokerConfig::default()).unwrap();
//! let sender: Arc<dyn MessageSender> = Arc::new(Discard);
//! let ground = Endpoint::new("ground", "maltcp://ground/", sender.clone());
//!
//! assert!(broker.add_endpoint(Endpoint::new("none", "", sender)).await.is_err());
//! assert!(broker.add_endpoint(ground.clone()).await.is_ok());
//! assert!(broker.add_endpoint(ground.clone()).await.is_err());
//! assert!(broker.delete_endpoint(ground.clone()).await.is_ok());
//! assert!(broker.delete_endpoint(ground).await.is_err());
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: outward `MoBroker`/`Endpoint` surface and the transport traits
//! - Control plane: topic → consumer → subscription index, publisher registrations,
//!   endpoint-registration lifecycle
//! - Routing: entity key wildcards, topic signatures and notify construction
//! - Data plane: ingress listener and egress worker pool
//! - Runtime: worker thread and runtime boundaries
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events/spans and does not unconditionally initialize a global
//! subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

mod api;
pub use api::endpoint::Endpoint;
pub use api::transport::{MessageListener, MessageSender};

mod config;
pub use config::BrokerConfig;

mod error;
pub use error::{BrokerError, Result};

mod control_plane;
pub use control_plane::broker_index::BrokerIndex;
pub use control_plane::report::{
    BrokerReport, ConsumerReport, PublisherReport, SubscriptionReport, TopicReport,
};

mod message;
pub use message::{
    EntityRequest, InboundBody, InboundMessage, InteractionStage, MessageHeader, NotifyEntry,
    OutboundBody, OutboundMessage, PublishedUpdate, SessionType, SubscriptionRequest, UpdateType,
};

mod routing;
pub use routing::entity_key::{matches, EntityKey};
pub use routing::topic_signature::TopicSignature;

mod data_plane;
#[doc(hidden)]
pub mod observability;
mod runtime;

mod mo_broker;
pub use mo_broker::MoBroker;
