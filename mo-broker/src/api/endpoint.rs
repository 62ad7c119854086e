//! Egress endpoints binding a consumer address range to a sender.

use crate::api::transport::MessageSender;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "endpoint";

/// A transport binding serving every consumer address starting with `address_prefix`.
#[derive(Clone)]
pub struct Endpoint {
    pub name: String,
    pub address_prefix: String,
    pub sender: Arc<dyn MessageSender>,
}

impl Endpoint {
    pub fn new(name: &str, address_prefix: &str, sender: Arc<dyn MessageSender>) -> Self {
        build_endpoint(name, address_prefix, sender)
    }

    /// Returns `true` when this endpoint serves `address`.
    #[inline]
    pub fn serves(&self, address: &str) -> bool {
        address.starts_with(&self.address_prefix)
    }
}

impl Debug for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("address_prefix", &self.address_prefix)
            .finish_non_exhaustive()
    }
}

#[inline(always)]
pub(crate) fn build_endpoint(
    name: &str,
    address_prefix: &str,
    sender: Arc<dyn MessageSender>,
) -> Endpoint {
    debug!(
        component = COMPONENT,
        name, address_prefix, "creating endpoint"
    );

    Endpoint {
        name: name.to_string(),
        address_prefix: address_prefix.to_string(),
        sender,
    }
}
