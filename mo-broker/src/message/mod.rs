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

//! Decoded message model.
//!
//! Transports decode wire frames into these types before handing them to the
//! broker, and encode [`OutboundMessage`]s after the broker is done. Nothing in
//! this module touches bytes on the wire.

pub(crate) mod header;
pub(crate) mod notify;
pub(crate) mod request;
pub(crate) mod update;

pub use header::{InteractionStage, MessageHeader, SessionType};
pub use notify::{NotifyEntry, OutboundBody, OutboundMessage};
pub use request::{EntityRequest, InboundBody, InboundMessage, SubscriptionRequest};
pub use update::{PublishedUpdate, UpdateType};
