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

//! Control-plane layer.
//!
//! Owns the subscription index (topic → consumer → subscription → filters), the
//! publisher registrations, and the endpoint-registration lifecycle. Register,
//! deregister and lost-consumer transitions are applied all-or-nothing under the
//! index lock, and empty consumers and topics are pruned on the way out.
//!
//! ```
//! use mo_broker::{
//!     BrokerIndex, EntityKey, EntityRequest, InteractionStage, MessageHeader, SessionType,
//! };
//!
//! let header = MessageHeader {
//!     uri_from: "maltcp://consumer".to_string(),
//!     uri_to: "maltcp://broker".to_string(),
//!     authentication_id: Vec::new(),
//!     timestamp: 0,
//!     interaction_stage: InteractionStage::Register,
//!     transaction_id: 1,
//!     domain: vec!["esa".to_string()],
//!     network_zone: "ground".to_string(),
//!     session: SessionType::Live,
//!     session_name: "LIVE".to_string(),
//!     area: 1,
//!     service: 1,
//!     operation: 1,
//!     area_version: 1,
//!     is_error_message: false,
//! };
//! let index = BrokerIndex::new();
//! let temp = EntityKey::new(Some("temp"), None, None, None);
//!
//! index.register(&header, "S1", &[EntityRequest::on_all([temp])]).unwrap();
//! assert_eq!(index.topic_count(), 1);
//! index.deregister(&header, &["S1"]).unwrap();
//! assert_eq!(index.topic_count(), 0);
//! ```

pub(crate) mod broker_index;
pub(crate) mod consumer_registry;
pub(crate) mod endpoint_lifecycle;
pub(crate) mod endpoint_table;
pub(crate) mod filter_set;
pub(crate) mod publisher_registry;
pub(crate) mod report;
pub(crate) mod sender_identity;
pub(crate) mod subscription_source;
