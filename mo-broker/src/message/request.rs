//! Decoded inbound requests handed to the broker by a transport.

use crate::message::header::{InteractionStage, MessageHeader};
use crate::message::update::PublishedUpdate;
use crate::routing::entity_key::EntityKey;
use serde::{Deserialize, Serialize};

/// One group of keys sharing a delivery policy inside a subscription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRequest {
    pub keys: Vec<EntityKey>,
    /// Deliver only `Modification` updates for these keys.
    #[serde(default)]
    pub only_on_change: bool,
}

impl EntityRequest {
    pub fn on_all(keys: impl IntoIterator<Item = EntityKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            only_on_change: false,
        }
    }

    pub fn on_change(keys: impl IntoIterator<Item = EntityKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            only_on_change: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub subscription_id: String,
    pub entity_requests: Vec<EntityRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundBody {
    Register {
        subscription: SubscriptionRequest,
    },
    Deregister {
        subscription_ids: Vec<String>,
    },
    PublishRegister {
        keys: Vec<EntityKey>,
    },
    PublishDeregister,
    Publish {
        updates: Vec<PublishedUpdate>,
    },
}

impl InboundBody {
    /// Request stage implied by the body.
    pub fn stage(&self) -> InteractionStage {
        match self {
            Self::Register { .. } => InteractionStage::Register,
            Self::Deregister { .. } => InteractionStage::Deregister,
            Self::PublishRegister { .. } => InteractionStage::PublishRegister,
            Self::PublishDeregister => InteractionStage::PublishDeregister,
            Self::Publish { .. } => InteractionStage::Publish,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub header: MessageHeader,
    pub body: InboundBody,
}
