//! Per-subscription filter sets.

use crate::message::EntityRequest;
use crate::routing::entity_key::EntityKey;
use std::collections::BTreeSet;

pub(crate) type KeySet = BTreeSet<EntityKey>;

/// Keys one subscription cares about, split by delivery policy.
///
/// `on_all ∪ on_change == required`. A key may sit in both sets when two entity
/// requests of the same subscription register it with different policies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SubscriptionFilterSet {
    required: KeySet,
    on_all: KeySet,
    on_change: KeySet,
}

impl SubscriptionFilterSet {
    pub(crate) fn from_requests(entity_requests: &[EntityRequest]) -> Self {
        let mut filters = Self::default();
        filters.set_filters(entity_requests);
        filters
    }

    /// Replaces every key set from a fresh request; prior filters never survive.
    pub(crate) fn set_filters(&mut self, entity_requests: &[EntityRequest]) {
        let mut required = KeySet::new();
        let mut on_all = KeySet::new();
        let mut on_change = KeySet::new();

        for entity_request in entity_requests {
            let target = if entity_request.only_on_change {
                &mut on_change
            } else {
                &mut on_all
            };
            for key in &entity_request.keys {
                target.insert(key.clone());
                required.insert(key.clone());
            }
        }

        self.required = required;
        self.on_all = on_all;
        self.on_change = on_change;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub(crate) fn required(&self) -> &KeySet {
        &self.required
    }

    pub(crate) fn on_all(&self) -> &KeySet {
        &self.on_all
    }

    pub(crate) fn on_change(&self) -> &KeySet {
        &self.on_change
    }
}

#[cfg(test)]
mod tests {
    use super::SubscriptionFilterSet;
    use crate::message::EntityRequest;
    use crate::routing::entity_key::EntityKey;

    fn key(first: &str) -> EntityKey {
        EntityKey::new(Some(first), None, None, None)
    }

    #[test]
    fn set_filters_splits_by_policy_and_keeps_union() {
        let filters = SubscriptionFilterSet::from_requests(&[
            EntityRequest::on_all([key("a"), key("b")]),
            EntityRequest::on_change([key("b"), key("c")]),
        ]);

        assert_eq!(filters.required().len(), 3);
        assert_eq!(filters.on_all().len(), 2);
        assert_eq!(filters.on_change().len(), 2);
        let union: Vec<_> = filters.on_all().union(filters.on_change()).cloned().collect();
        assert_eq!(union, filters.required().iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn set_filters_replaces_instead_of_merging() {
        let mut filters =
            SubscriptionFilterSet::from_requests(&[EntityRequest::on_all([key("old")])]);
        filters.set_filters(&[EntityRequest::on_change([key("new")])]);

        assert!(!filters.required().contains(&key("old")));
        assert!(filters.on_all().is_empty());
        assert!(filters.on_change().contains(&key("new")));
    }

    #[test]
    fn empty_requests_leave_an_empty_set() {
        let filters = SubscriptionFilterSet::from_requests(&[EntityRequest::on_all(Vec::new())]);

        assert!(filters.is_empty());
    }
}
