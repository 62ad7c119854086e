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

//! Data-plane layer.
//!
//! Owns the ingress listener that applies inbound requests to the index, and the
//! egress worker pool that delivers notifies, acknowledgements and error replies.
//! Each sender gets one pooled worker no matter how many endpoints share it.
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
//! let endpoint = Endpoint::new("ground", "maltcp://ground/", Arc::new(Discard));
//!
//! // Adding and deleting endpoints creates and drops egress workers.
//! broker.add_endpoint(endpoint.clone()).await.unwrap();
//! broker.delete_endpoint(endpoint).await.unwrap();
//! # });
//! ```

pub(crate) mod egress_pool;
pub(crate) mod egress_worker;
pub(crate) mod ingress_listener;
