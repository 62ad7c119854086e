//! Outbound messages produced by the broker.

use crate::message::header::MessageHeader;
use crate::message::update::PublishedUpdate;
use serde::{Deserialize, Serialize};

/// Matched updates for one subscription of the receiving consumer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyEntry {
    pub subscription_id: String,
    pub updates: Vec<PublishedUpdate>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboundBody {
    Notify { entries: Vec<NotifyEntry> },
    Ack,
    Error { code: String, info: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub header: MessageHeader,
    pub body: OutboundBody,
}

impl OutboundMessage {
    pub fn notify(header: MessageHeader, entries: Vec<NotifyEntry>) -> Self {
        Self {
            header,
            body: OutboundBody::Notify { entries },
        }
    }

    pub fn ack(header: MessageHeader) -> Self {
        Self {
            header,
            body: OutboundBody::Ack,
        }
    }

    pub fn error(mut header: MessageHeader, code: &str, info: impl Into<String>) -> Self {
        header.is_error_message = true;
        Self {
            header,
            body: OutboundBody::Error {
                code: code.to_string(),
                info: info.into(),
            },
        }
    }

    /// Destination address.
    pub fn destination(&self) -> &str {
        &self.header.uri_to
    }

    /// Notify entries, empty for acknowledgements and errors.
    pub fn notifications(&self) -> &[NotifyEntry] {
        match &self.body {
            OutboundBody::Notify { entries } => entries,
            _ => &[],
        }
    }

    /// Entry for one subscription id, if this notify carries it.
    pub fn entry(&self, subscription_id: &str) -> Option<&NotifyEntry> {
        self.notifications()
            .iter()
            .find(|entry| entry.subscription_id == subscription_id)
    }
}
