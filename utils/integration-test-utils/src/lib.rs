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

//! Shared fixtures for broker integration tests: recording senders, header
//! builders and one-time tracing setup.

use async_trait::async_trait;
use mo_broker::{
    BrokerError, EntityKey, InteractionStage, MessageHeader, MessageSender, OutboundMessage,
    Result, SessionType,
};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::debug;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Installs a test-writer `tracing` subscriber once per test binary.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Sender that keeps every message it is asked to deliver.
#[derive(Default)]
pub struct RecordingSender {
    received: Mutex<Vec<Arc<OutboundMessage>>>,
    arrived: Notify,
}

impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<Arc<OutboundMessage>> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn received_for(&self, destination: &str) -> Vec<Arc<OutboundMessage>> {
        self.received()
            .into_iter()
            .filter(|message| message.destination() == destination)
            .collect()
    }

    /// Waits until at least `count` messages arrived, or `timeout` elapsed.
    ///
    /// Returns whatever was received by then.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<Arc<OutboundMessage>> {
        let _ = tokio::time::timeout(timeout, async {
            loop {
                let arrived = self.arrived.notified();
                if self.received().len() >= count {
                    return;
                }
                arrived.await;
            }
        })
        .await;
        self.received()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, message: Arc<OutboundMessage>) -> Result<()> {
        debug!(
            destination = message.destination(),
            stage = %message.header.interaction_stage,
            "recording outbound message"
        );
        if let Ok(mut received) = self.received.lock() {
            received.push(message);
        }
        self.arrived.notify_waiters();
        Ok(())
    }
}

/// Sender whose every destination is gone.
#[derive(Default)]
pub struct UnreachableSender {
    attempts: Mutex<usize>,
    attempted: Notify,
}

impl UnreachableSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|attempts| *attempts).unwrap_or_default()
    }

    pub async fn wait_for_attempts(&self, count: usize, timeout: Duration) -> usize {
        let _ = tokio::time::timeout(timeout, async {
            loop {
                let attempted = self.attempted.notified();
                if self.attempts() >= count {
                    return;
                }
                attempted.await;
            }
        })
        .await;
        self.attempts()
    }
}

#[async_trait]
impl MessageSender for UnreachableSender {
    async fn send(&self, message: Arc<OutboundMessage>) -> Result<()> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }
        self.attempted.notify_waiters();
        Err(BrokerError::consumer_unreachable(
            message.destination(),
            "connection refused",
        ))
    }
}

/// Header for the default test topic: domain `esa.mission`, zone `ground`, live
/// session, area 4 / service 6 / operation 1.
pub fn header(from: &str) -> MessageHeader {
    MessageHeader {
        uri_from: from.to_string(),
        uri_to: "maltcp://localhost/broker".to_string(),
        authentication_id: Vec::new(),
        timestamp: 0,
        interaction_stage: InteractionStage::Register,
        transaction_id: 1,
        domain: vec!["esa".to_string(), "mission".to_string()],
        network_zone: "ground".to_string(),
        session: SessionType::Live,
        session_name: "LIVE".to_string(),
        area: 4,
        service: 6,
        operation: 1,
        area_version: 1,
        is_error_message: false,
    }
}

/// Same as [`header`] but on another domain, hence another topic.
pub fn header_in_domain(from: &str, domain: &[&str]) -> MessageHeader {
    MessageHeader {
        domain: domain.iter().map(|element| element.to_string()).collect(),
        ..header(from)
    }
}

pub fn publish_header(from: &str) -> MessageHeader {
    MessageHeader {
        interaction_stage: InteractionStage::Publish,
        ..header(from)
    }
}

/// Fully specified key with a string first slot.
pub fn key(first: &str, second: i64, third: i64, fourth: i64) -> EntityKey {
    EntityKey::new(Some(first), Some(second), Some(third), Some(fourth))
}
