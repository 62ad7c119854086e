//! Published update records.

use crate::routing::entity_key::EntityKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publisher-supplied tag describing what happened to an entity.
///
/// The broker does not verify the tag against earlier updates; on-change
/// filters rely on the publisher's claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Creation,
    Deletion,
    Modification,
    PlainUpdate,
}

impl UpdateType {
    /// Returns `true` for the only type that fires on-change filters.
    #[inline]
    pub fn is_change(self) -> bool {
        matches!(self, Self::Modification)
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Creation => "CREATION",
            Self::Deletion => "DELETION",
            Self::Modification => "MODIFICATION",
            Self::PlainUpdate => "UPDATE",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedUpdate {
    pub key: EntityKey,
    pub update_type: UpdateType,
    /// Opaque encoded body, never inspected by the broker.
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl PublishedUpdate {
    pub fn new(key: EntityKey, update_type: UpdateType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            update_type,
            payload: payload.into(),
        }
    }
}
