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

//! API facade layer.
//!
//! Transport adapters implement [`transport::MessageSender`] for egress and feed
//! decoded inbound traffic to a [`transport::MessageListener`]. An
//! [`endpoint::Endpoint`] binds a sender to the consumer addresses it serves.
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mo_broker::{Endpoint, MessageSender, OutboundMessage, Result};
//!
//! struct TcpSender;
//!
//! #[async_trait]
//! impl MessageSender for TcpSender {
//!     async fn send(&self, _message: Arc<OutboundMessage>) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let tcp = Endpoint::new("tcp", "maltcp://", Arc::new(TcpSender));
//! assert!(tcp.serves("maltcp://ground:1024/consumer"));
//! ```

pub mod endpoint;
pub mod transport;
