//! Endpoint-rule identity tuple construction for the control plane.

use crate::api::endpoint::Endpoint;
use crate::control_plane::sender_identity::SenderIdentityKey;

/// `(address_prefix, sender identity)` of a registered endpoint.
pub(crate) type EndpointRule = (String, SenderIdentityKey);

#[inline(always)]
pub(crate) fn build_endpoint_rule(endpoint: &Endpoint) -> EndpointRule {
    (
        endpoint.address_prefix.clone(),
        SenderIdentityKey::new(endpoint.sender.clone()),
    )
}
