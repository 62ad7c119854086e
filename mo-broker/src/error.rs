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

//! Broker error types.

use crate::routing::entity_key::EntityKey;
use thiserror::Error;

/// Result type for broker operations
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Errors surfaced by the broker core, its facade and its transport seams.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// A request was rejected before any state was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A publisher sent keys it never registered.
    #[error("publisher '{publisher}' is not registered for {} key(s)", keys.len())]
    UnknownEntityKeys {
        /// Address of the offending publisher
        publisher: String,
        /// Keys of the rejected updates, in batch order
        keys: Vec<EntityKey>,
    },

    /// A sender could not reach the consumer; triggers lost-consumer cleanup.
    #[error("consumer '{address}' unreachable: {reason}")]
    ConsumerUnreachable {
        /// Destination address of the failed message
        address: String,
        /// Transport supplied reason
        reason: String,
    },

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BrokerError {
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[inline]
    pub fn consumer_unreachable(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConsumerUnreachable {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable tag used in error replies and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::UnknownEntityKeys { .. } => "UNKNOWN_ENTITY_KEYS",
            Self::ConsumerUnreachable { .. } => "CONSUMER_UNREACHABLE",
            Self::Transport(_) => "TRANSPORT",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG",
        }
    }
}
