//! Flat message header shared by inbound requests and outbound messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session a message belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    #[default]
    Live,
    Simulation,
    Replay,
}

/// Stage of the publish/subscribe interaction a message carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStage {
    Register,
    RegisterAck,
    Deregister,
    DeregisterAck,
    PublishRegister,
    PublishRegisterAck,
    PublishDeregister,
    PublishDeregisterAck,
    Publish,
    PublishError,
    Notify,
}

impl InteractionStage {
    /// Acknowledgement stage answering a request stage, if the stage has one.
    pub fn ack(self) -> Option<Self> {
        match self {
            Self::Register => Some(Self::RegisterAck),
            Self::Deregister => Some(Self::DeregisterAck),
            Self::PublishRegister => Some(Self::PublishRegisterAck),
            Self::PublishDeregister => Some(Self::PublishDeregisterAck),
            Self::Publish => Some(Self::PublishError),
            _ => None,
        }
    }
}

impl fmt::Display for InteractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Register => "REGISTER",
            Self::RegisterAck => "REGISTER_ACK",
            Self::Deregister => "DEREGISTER",
            Self::DeregisterAck => "DEREGISTER_ACK",
            Self::PublishRegister => "PUBLISH_REGISTER",
            Self::PublishRegisterAck => "PUBLISH_REGISTER_ACK",
            Self::PublishDeregister => "PUBLISH_DEREGISTER",
            Self::PublishDeregisterAck => "PUBLISH_DEREGISTER_ACK",
            Self::Publish => "PUBLISH",
            Self::PublishError => "PUBLISH_ERROR",
            Self::Notify => "NOTIFY",
        };
        f.write_str(label)
    }
}

/// Already-decoded header fields the broker reads and rewrites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Address of the sender (consumer on register, publisher on publish).
    pub uri_from: String,
    /// Destination address (the consumer on notify and lost-consumer cleanup).
    #[serde(default)]
    pub uri_to: String,
    #[serde(default)]
    pub authentication_id: Vec<u8>,
    #[serde(default)]
    pub timestamp: u64,
    pub interaction_stage: InteractionStage,
    #[serde(default)]
    pub transaction_id: u64,
    pub domain: Vec<String>,
    pub network_zone: String,
    #[serde(default)]
    pub session: SessionType,
    #[serde(default)]
    pub session_name: String,
    pub area: u16,
    pub service: u16,
    pub operation: u16,
    pub area_version: u8,
    #[serde(default)]
    pub is_error_message: bool,
}

impl MessageHeader {
    /// Copy of this header addressed back to its sender at the given stage.
    pub fn reply(&self, stage: InteractionStage, from: &str) -> Self {
        Self {
            uri_from: from.to_string(),
            uri_to: self.uri_from.clone(),
            interaction_stage: stage,
            is_error_message: false,
            ..self.clone()
        }
    }

    /// Copy of this header forwarded to a consumer at the notify stage.
    pub fn notify_to(&self, consumer: &str) -> Self {
        Self {
            uri_to: consumer.to_string(),
            interaction_stage: InteractionStage::Notify,
            is_error_message: false,
            ..self.clone()
        }
    }
}
