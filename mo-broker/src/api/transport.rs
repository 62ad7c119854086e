//! Transport seams: what the broker needs from a transport, and what it offers one.

use crate::error::Result;
use crate::message::{InboundMessage, OutboundMessage};
use async_trait::async_trait;
use std::sync::Arc;

/// Delivers encoded outbound messages to their destination.
///
/// Implementations return [`crate::BrokerError::ConsumerUnreachable`] when the
/// destination is gone; the broker then drops that consumer's subscriptions for
/// the message's topic.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: Arc<OutboundMessage>) -> Result<()>;
}

/// Entry point a transport calls for every decoded inbound message.
#[async_trait]
pub trait MessageListener: Send + Sync {
    async fn on_receive(&self, message: InboundMessage);
}
