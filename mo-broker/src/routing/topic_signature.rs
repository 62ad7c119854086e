//! Topic identity derived from message headers.

use crate::error::{BrokerError, Result};
use crate::message::{MessageHeader, SessionType};
use serde::Serialize;
use std::fmt;

/// Identifies one publish/subscribe channel.
///
/// Two headers map to the same signature iff domain (as an ordered path), network
/// zone, session type, session name, area, service, operation and area version
/// all compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TopicSignature {
    pub domain: Vec<String>,
    pub network_zone: String,
    pub session: SessionType,
    pub session_name: String,
    pub area: u16,
    pub service: u16,
    pub operation: u16,
    pub area_version: u8,
}

impl TopicSignature {
    /// Builds the signature, rejecting headers that cannot name a topic.
    pub fn from_header(header: &MessageHeader) -> Result<Self> {
        if header.domain.is_empty() {
            return Err(BrokerError::invalid_argument("header domain is empty"));
        }
        if header.domain.iter().any(String::is_empty) {
            return Err(BrokerError::invalid_argument(
                "header domain contains an empty identifier",
            ));
        }
        if header.network_zone.is_empty() {
            return Err(BrokerError::invalid_argument("header network zone is empty"));
        }

        Ok(Self {
            domain: header.domain.clone(),
            network_zone: header.network_zone.clone(),
            session: header.session,
            session_name: header.session_name.clone(),
            area: header.area,
            service: header.service,
            operation: header.operation,
            area_version: header.area_version,
        })
    }
}

impl fmt::Display for TopicSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{:?}/{}:{}.{}.{}v{}",
            self.domain.join("."),
            self.network_zone,
            self.session,
            self.session_name,
            self.area,
            self.service,
            self.operation,
            self.area_version
        )
    }
}
