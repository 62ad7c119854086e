//! Notify fan-out for one published batch.

use crate::control_plane::consumer_registry::ConsumerRegistry;
use crate::control_plane::filter_set::{KeySet, SubscriptionFilterSet};
use crate::control_plane::subscription_source::SubscriptionSource;
use crate::message::{MessageHeader, NotifyEntry, OutboundMessage, PublishedUpdate};

/// Builds outbound notify messages from one topic's subscriptions.
pub(crate) struct NotifyBuilder;

impl NotifyBuilder {
    /// Returns `true` when any key of `required` accepts any update of the batch.
    pub(crate) fn overlaps(required: &KeySet, updates: &[PublishedUpdate]) -> bool {
        updates
            .iter()
            .any(|update| required.iter().any(|key| key.matches(&update.key)))
    }

    /// Updates of the batch one subscription receives, in batch order.
    pub(crate) fn match_subscription(
        filters: &SubscriptionFilterSet,
        updates: &[PublishedUpdate],
    ) -> Vec<PublishedUpdate> {
        updates
            .iter()
            .filter(|update| {
                filters.on_all().iter().any(|key| key.matches(&update.key))
                    || (update.update_type.is_change()
                        && filters.on_change().iter().any(|key| key.matches(&update.key)))
            })
            .cloned()
            .collect()
    }

    fn consumer_entries(
        registry: &ConsumerRegistry,
        updates: &[PublishedUpdate],
    ) -> Vec<NotifyEntry> {
        if !Self::overlaps(registry.required(), updates) {
            return Vec::new();
        }

        registry
            .subscriptions()
            .filter_map(|(subscription_id, filters)| {
                let matched = Self::match_subscription(filters, updates);
                (!matched.is_empty()).then(|| NotifyEntry {
                    subscription_id: subscription_id.clone(),
                    updates: matched,
                })
            })
            .collect()
    }

    /// One message per consumer with at least one matched update, in consumer order.
    pub(crate) fn build(
        source: &SubscriptionSource,
        header: &MessageHeader,
        updates: &[PublishedUpdate],
    ) -> Vec<OutboundMessage> {
        source
            .consumers()
            .filter_map(|(consumer_id, registry)| {
                let entries = Self::consumer_entries(registry, updates);
                (!entries.is_empty())
                    .then(|| OutboundMessage::notify(header.notify_to(consumer_id), entries))
            })
            .collect()
    }
}
