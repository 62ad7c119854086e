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

//! Broker configuration, loaded from JSON5.

use crate::error::{BrokerError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, canonicalize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Name used in log output.
    pub name: String,
    /// Address the broker answers from in acknowledgements and error replies.
    pub broker_uri: String,
    /// Capacity of each egress worker queue.
    pub message_queue_size: u16,
    /// Reject publishes whose keys the publisher never registered.
    pub enforce_publisher_registration: bool,
    /// Reply to register/deregister requests with an ack stage.
    pub acknowledge_requests: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            name: "mo-broker".to_string(),
            broker_uri: "maltcp://localhost/broker".to_string(),
            message_queue_size: 64,
            enforce_publisher_registration: false,
            acknowledge_requests: true,
        }
    }
}

impl BrokerConfig {
    pub fn from_json5_str(data: &str) -> Result<Self> {
        let config: Self = json5::from_str(data)
            .map_err(|error| BrokerError::Config(format!("Unable to parse JSON5: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config_file = PathBuf::from(path.as_ref());
        debug!(config_file = ?config_file, "loading broker configuration");

        let config_file = canonicalize(config_file).map_err(|error| {
            BrokerError::Config(format!("Configuration file not found: {error}"))
        })?;
        let data = fs::read_to_string(&config_file)
            .map_err(|error| BrokerError::Config(format!("Unable to read file: {error}")))?;

        Self::from_json5_str(&data)
    }

    pub fn validate(&self) -> Result<()> {
        if self.message_queue_size == 0 {
            return Err(BrokerError::Config(
                "message_queue_size must be greater than zero".to_string(),
            ));
        }
        if self.broker_uri.is_empty() {
            return Err(BrokerError::Config("broker_uri must not be empty".to_string()));
        }
        Ok(())
    }
}
