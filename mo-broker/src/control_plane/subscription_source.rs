//! Per-topic subscription index.

use crate::control_plane::consumer_registry::ConsumerRegistry;
use crate::control_plane::filter_set::{KeySet, SubscriptionFilterSet};
use crate::routing::topic_signature::TopicSignature;
use std::collections::BTreeMap;

pub(crate) type ConsumerId = String;

/// Every consumer subscribed under one topic signature.
#[derive(Debug)]
pub(crate) struct SubscriptionSource {
    signature: TopicSignature,
    consumers: BTreeMap<ConsumerId, ConsumerRegistry>,
    required: KeySet,
}

impl SubscriptionSource {
    pub(crate) fn new(signature: TopicSignature) -> Self {
        Self {
            signature,
            consumers: BTreeMap::new(),
            required: KeySet::new(),
        }
    }

    pub(crate) fn signature(&self) -> &TopicSignature {
        &self.signature
    }

    pub(crate) fn add_subscription(
        &mut self,
        consumer_id: &str,
        subscription_id: &str,
        filters: SubscriptionFilterSet,
    ) {
        let registry = self
            .consumers
            .entry(consumer_id.to_string())
            .or_insert_with(ConsumerRegistry::new);
        registry.add_or_replace_subscription(subscription_id, filters);
        if registry.is_empty() {
            self.consumers.remove(consumer_id);
        }
        self.recompute_required();
    }

    /// Returns the number of subscriptions removed.
    pub(crate) fn remove_subscriptions<S: AsRef<str>>(
        &mut self,
        consumer_id: &str,
        subscription_ids: &[S],
    ) -> usize {
        let Some(registry) = self.consumers.get_mut(consumer_id) else {
            return 0;
        };
        let removed = registry.remove_subscriptions(subscription_ids);
        if registry.is_empty() {
            self.consumers.remove(consumer_id);
        }
        if removed > 0 {
            self.recompute_required();
        }
        removed
    }

    /// Drops every subscription of a consumer the transport reported lost.
    pub(crate) fn remove_all_subscriptions(&mut self, consumer_id: &str) -> usize {
        let Some(mut registry) = self.consumers.remove(consumer_id) else {
            return 0;
        };
        let removed = registry.remove_all_subscriptions();
        self.recompute_required();
        removed
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    pub(crate) fn required(&self) -> &KeySet {
        &self.required
    }

    /// Consumers in ascending address order.
    pub(crate) fn consumers(&self) -> impl Iterator<Item = (&ConsumerId, &ConsumerRegistry)> {
        self.consumers.iter()
    }

    #[cfg(test)]
    pub(crate) fn consumer(&self, consumer_id: &str) -> Option<&ConsumerRegistry> {
        self.consumers.get(consumer_id)
    }

    pub(crate) fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    fn recompute_required(&mut self) {
        self.required = self
            .consumers
            .values()
            .flat_map(|registry| registry.required().iter().cloned())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::SubscriptionSource;
    use crate::control_plane::filter_set::SubscriptionFilterSet;
    use crate::message::EntityRequest;
    use crate::message::SessionType;
    use crate::routing::entity_key::EntityKey;
    use crate::routing::topic_signature::TopicSignature;

    fn signature() -> TopicSignature {
        TopicSignature {
            domain: vec!["esa".to_string()],
            network_zone: "ground".to_string(),
            session: SessionType::Live,
            session_name: "LIVE".to_string(),
            area: 1,
            service: 1,
            operation: 1,
            area_version: 1,
        }
    }

    fn filters(first: &str) -> SubscriptionFilterSet {
        SubscriptionFilterSet::from_requests(&[EntityRequest::on_all([EntityKey::new(
            Some(first),
            None,
            None,
            None,
        )])])
    }

    #[test]
    fn source_keeps_its_topic_signature() {
        let source = SubscriptionSource::new(signature());

        assert_eq!(source.signature(), &signature());
        assert!(source.is_empty());
    }

    #[test]
    fn consumers_iterate_in_address_order() {
        let mut source = SubscriptionSource::new(signature());
        source.add_subscription("maltcp://c", "S1", filters("a"));
        source.add_subscription("maltcp://a", "S1", filters("a"));
        source.add_subscription("maltcp://b", "S1", filters("a"));

        let order: Vec<&str> = source.consumers().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["maltcp://a", "maltcp://b", "maltcp://c"]);
    }

    #[test]
    fn removing_last_subscription_prunes_consumer() {
        let mut source = SubscriptionSource::new(signature());
        source.add_subscription("maltcp://a", "S1", filters("a"));
        source.add_subscription("maltcp://b", "S1", filters("b"));

        assert_eq!(source.remove_subscriptions("maltcp://a", &["S1"]), 1);
        assert!(source.consumer("maltcp://a").is_none());
        assert_eq!(source.required().len(), 1);

        assert_eq!(source.remove_subscriptions("maltcp://b", &["S1"]), 1);
        assert!(source.is_empty());
        assert!(source.required().is_empty());
    }

    #[test]
    fn unknown_consumer_is_a_no_op() {
        let mut source = SubscriptionSource::new(signature());
        source.add_subscription("maltcp://a", "S1", filters("a"));

        assert_eq!(source.remove_subscriptions("maltcp://zz", &["S1"]), 0);
        assert_eq!(source.remove_all_subscriptions("maltcp://zz"), 0);
        assert_eq!(source.consumer_count(), 1);
    }

    #[test]
    fn lost_consumer_removes_all_its_subscriptions() {
        let mut source = SubscriptionSource::new(signature());
        source.add_subscription("maltcp://a", "S1", filters("a"));
        source.add_subscription("maltcp://a", "S2", filters("b"));
        source.add_subscription("maltcp://b", "S1", filters("c"));

        assert_eq!(source.remove_all_subscriptions("maltcp://a"), 2);
        assert_eq!(source.consumer_count(), 1);
        assert_eq!(source.required().len(), 1);
    }

    #[test]
    fn empty_registration_does_not_create_consumer() {
        let mut source = SubscriptionSource::new(signature());
        source.add_subscription("maltcp://a", "S1", SubscriptionFilterSet::default());

        assert!(source.is_empty());
    }
}
