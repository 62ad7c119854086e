//! Endpoint-rule lifecycle primitives for the control plane.

use crate::control_plane::endpoint_table::EndpointRule;
use std::collections::HashSet;
use tokio::sync::Mutex;

pub(crate) type EndpointRules = Mutex<HashSet<EndpointRule>>;

/// Inserts a rule unless another rule already claims the same address prefix.
pub(crate) async fn insert_endpoint_rule(
    registered_endpoint_rules: &EndpointRules,
    endpoint_rule: EndpointRule,
) -> bool {
    let mut registered = registered_endpoint_rules.lock().await;
    if registered
        .iter()
        .any(|(address_prefix, _)| *address_prefix == endpoint_rule.0)
    {
        return false;
    }
    registered.insert(endpoint_rule)
}

pub(crate) async fn remove_endpoint_rule(
    registered_endpoint_rules: &EndpointRules,
    endpoint_rule: &EndpointRule,
) -> bool {
    let mut registered = registered_endpoint_rules.lock().await;
    registered.remove(endpoint_rule)
}
