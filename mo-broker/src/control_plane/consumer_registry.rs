//! Per-consumer subscription registry.

use crate::control_plane::filter_set::{KeySet, SubscriptionFilterSet};
use std::collections::BTreeMap;

pub(crate) type SubscriptionId = String;

/// Subscriptions held by one consumer address within one topic.
#[derive(Debug, Default)]
pub(crate) struct ConsumerRegistry {
    subscriptions: BTreeMap<SubscriptionId, SubscriptionFilterSet>,
    required: KeySet,
}

impl ConsumerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts or fully replaces a subscription. An empty filter set removes it.
    pub(crate) fn add_or_replace_subscription(
        &mut self,
        subscription_id: &str,
        filters: SubscriptionFilterSet,
    ) {
        if filters.is_empty() {
            self.subscriptions.remove(subscription_id);
        } else {
            self.subscriptions.insert(subscription_id.to_string(), filters);
        }
        self.recompute_required();
    }

    /// Removes the named subscriptions; unknown ids are ignored. Returns how many went away.
    pub(crate) fn remove_subscriptions<S: AsRef<str>>(&mut self, subscription_ids: &[S]) -> usize {
        let removed = subscription_ids
            .iter()
            .filter(|id| self.subscriptions.remove(id.as_ref()).is_some())
            .count();
        if removed > 0 {
            self.recompute_required();
        }
        removed
    }

    pub(crate) fn remove_all_subscriptions(&mut self) -> usize {
        let removed = self.subscriptions.len();
        self.subscriptions.clear();
        self.required.clear();
        removed
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub(crate) fn required(&self) -> &KeySet {
        &self.required
    }

    pub(crate) fn subscriptions(
        &self,
    ) -> impl Iterator<Item = (&SubscriptionId, &SubscriptionFilterSet)> {
        self.subscriptions.iter()
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn recompute_required(&mut self) {
        self.required = self
            .subscriptions
            .values()
            .flat_map(|filters| filters.required().iter().cloned())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::ConsumerRegistry;
    use crate::control_plane::filter_set::SubscriptionFilterSet;
    use crate::message::EntityRequest;
    use crate::routing::entity_key::EntityKey;

    fn filters(first: &str) -> SubscriptionFilterSet {
        SubscriptionFilterSet::from_requests(&[EntityRequest::on_all([EntityKey::new(
            Some(first),
            None,
            None,
            None,
        )])])
    }

    fn key(first: &str) -> EntityKey {
        EntityKey::new(Some(first), None, None, None)
    }

    #[test]
    fn replace_drops_previous_keys_from_union() {
        let mut registry = ConsumerRegistry::new();
        registry.add_or_replace_subscription("S1", filters("temp"));
        registry.add_or_replace_subscription("S1", filters("pressure"));

        assert_eq!(registry.subscription_count(), 1);
        assert!(!registry.required().contains(&key("temp")));
        assert!(registry.required().contains(&key("pressure")));
    }

    #[test]
    fn union_spans_all_subscriptions() {
        let mut registry = ConsumerRegistry::new();
        registry.add_or_replace_subscription("S1", filters("a"));
        registry.add_or_replace_subscription("S2", filters("b"));

        assert_eq!(registry.required().len(), 2);

        assert_eq!(registry.remove_subscriptions(&["S1", "unknown"]), 1);
        assert_eq!(registry.required().len(), 1);
        assert!(registry.required().contains(&key("b")));
    }

    #[test]
    fn empty_filters_remove_the_entry() {
        let mut registry = ConsumerRegistry::new();
        registry.add_or_replace_subscription("S1", filters("a"));
        registry.add_or_replace_subscription("S1", SubscriptionFilterSet::default());

        assert!(registry.is_empty());
        assert!(registry.required().is_empty());
    }

    #[test]
    fn remove_all_clears_everything() {
        let mut registry = ConsumerRegistry::new();
        registry.add_or_replace_subscription("S1", filters("a"));
        registry.add_or_replace_subscription("S2", filters("b"));

        assert_eq!(registry.remove_all_subscriptions(), 2);
        assert!(registry.is_empty());
        assert!(registry.required().is_empty());
    }
}
