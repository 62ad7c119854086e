//! Top-level topic index and the exposed broker operations.

use crate::control_plane::filter_set::{KeySet, SubscriptionFilterSet};
use crate::control_plane::publisher_registry::{PublishCheck, PublisherSource};
use crate::control_plane::report::{
    BrokerReport, ConsumerReport, PublisherReport, SubscriptionReport, TopicReport,
};
use crate::control_plane::subscription_source::SubscriptionSource;
use crate::error::{BrokerError, Result};
use crate::message::{EntityRequest, MessageHeader, OutboundMessage, PublishedUpdate};
use crate::observability::{events, fields};
use crate::routing::entity_key::EntityKey;
use crate::routing::notify_builder::NotifyBuilder;
use crate::routing::topic_signature::TopicSignature;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

const COMPONENT: &str = "broker_index";

#[derive(Debug, Default)]
struct IndexState {
    sources: BTreeMap<TopicSignature, SubscriptionSource>,
    publishers: BTreeMap<TopicSignature, PublisherSource>,
}

/// Root of the broker: topic signature → subscriptions, plus publisher registrations.
///
/// Every operation takes the single index lock for its whole duration, so a
/// concurrent caller never observes a half-applied register or a filter set
/// mid-replacement. All operations are synchronous and perform no I/O.
#[derive(Debug, Default)]
pub struct BrokerIndex {
    state: Mutex<IndexState>,
}

fn require_address<'a>(address: &'a str, role: &str) -> Result<&'a str> {
    if address.is_empty() {
        return Err(BrokerError::invalid_argument(format!(
            "{role} address is missing from the header"
        )));
    }
    Ok(address)
}

fn render_keys(keys: &KeySet) -> Vec<String> {
    keys.iter().map(ToString::to_string).collect()
}

impl BrokerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or fully replaces `subscription_id` for the consumer at `header.uri_from`.
    ///
    /// A request whose entity requests carry no keys removes the subscription.
    pub fn register(
        &self,
        header: &MessageHeader,
        subscription_id: &str,
        entity_requests: &[EntityRequest],
    ) -> Result<()> {
        let consumer = require_address(&header.uri_from, "consumer")?;
        if subscription_id.is_empty() {
            return Err(BrokerError::invalid_argument("subscription id is empty"));
        }
        let signature = TopicSignature::from_header(header)?;
        let filters = SubscriptionFilterSet::from_requests(entity_requests);

        let mut state = self.state.lock();
        if filters.is_empty() {
            debug!(
                event = events::SUBSCRIPTION_REGISTERED,
                component = COMPONENT,
                topic = %signature,
                consumer,
                subscription_id,
                "empty filter set, treating register as removal"
            );
            Self::remove_from_topic(&mut state, &signature, |source| {
                source.remove_subscriptions(consumer, &[subscription_id])
            });
            return Ok(());
        }

        debug!(
            event = events::SUBSCRIPTION_REGISTERED,
            component = COMPONENT,
            topic = %signature,
            consumer,
            subscription_id,
            on_all = %fields::format_keys(filters.on_all()),
            on_change = %fields::format_keys(filters.on_change()),
            "registering subscription"
        );

        let source = state
            .sources
            .entry(signature.clone())
            .or_insert_with(|| {
                info!(
                    event = events::TOPIC_CREATED,
                    component = COMPONENT,
                    topic = %signature,
                    "creating subscription source"
                );
                SubscriptionSource::new(signature.clone())
            });
        source.add_subscription(consumer, subscription_id, filters);
        Ok(())
    }

    /// Removes the named subscriptions of the consumer at `header.uri_from`.
    ///
    /// Unknown ids are skipped; the remaining ids are still processed.
    pub fn deregister<S: AsRef<str>>(
        &self,
        header: &MessageHeader,
        subscription_ids: &[S],
    ) -> Result<()> {
        let consumer = require_address(&header.uri_from, "consumer")?;
        let signature = TopicSignature::from_header(header)?;

        let mut state = self.state.lock();
        let removed = Self::remove_from_topic(&mut state, &signature, |source| {
            source.remove_subscriptions(consumer, subscription_ids)
        });
        debug!(
            event = events::SUBSCRIPTION_DEREGISTERED,
            component = COMPONENT,
            topic = %signature,
            consumer,
            requested = subscription_ids.len(),
            removed,
            "deregistered subscriptions"
        );
        Ok(())
    }

    /// Drops every subscription the consumer at `header.uri_to` holds under the
    /// header's topic. Called once per affected topic by the transport layer.
    pub fn remove_lost_consumer(&self, header: &MessageHeader) -> Result<()> {
        let consumer = require_address(&header.uri_to, "lost consumer")?;
        let signature = TopicSignature::from_header(header)?;

        let mut state = self.state.lock();
        let removed = Self::remove_from_topic(&mut state, &signature, |source| {
            source.remove_all_subscriptions(consumer)
        });
        if removed > 0 {
            info!(
                event = events::CONSUMER_LOST,
                component = COMPONENT,
                topic = %signature,
                consumer,
                removed,
                "removed lost consumer"
            );
        }
        Ok(())
    }

    /// Computes the notify messages for one published batch.
    ///
    /// Returns an empty list when the topic has no subscribers or no subscribed key
    /// overlaps the batch.
    pub fn create_notify(
        &self,
        header: &MessageHeader,
        updates: &[PublishedUpdate],
    ) -> Result<Vec<OutboundMessage>> {
        let signature = TopicSignature::from_header(header)?;

        let state = self.state.lock();
        let Some(source) = state.sources.get(&signature) else {
            debug!(
                event = events::NOTIFY_FAST_PATH_SKIP,
                component = COMPONENT,
                topic = %signature,
                reason = "no_subscription_source",
                "no subscribers for topic"
            );
            return Ok(Vec::new());
        };
        if !NotifyBuilder::overlaps(source.required(), updates) {
            debug!(
                event = events::NOTIFY_FAST_PATH_SKIP,
                component = COMPONENT,
                topic = %signature,
                updates = updates.len(),
                reason = "no_key_overlap",
                "no subscribed key matches the batch"
            );
            return Ok(Vec::new());
        }

        let messages = NotifyBuilder::build(source, header, updates);
        debug!(
            event = events::NOTIFY_BUILT,
            component = COMPONENT,
            topic = %signature,
            updates = updates.len(),
            consumers = source.consumer_count(),
            notifies = messages.len(),
            "built notify messages"
        );
        Ok(messages)
    }

    /// Replaces the keys the publisher at `header.uri_from` may publish under the topic.
    pub fn publish_register(&self, header: &MessageHeader, keys: &[EntityKey]) -> Result<()> {
        let publisher = require_address(&header.uri_from, "publisher")?;
        let signature = TopicSignature::from_header(header)?;
        let keys: KeySet = keys.iter().cloned().collect();

        debug!(
            event = events::PUBLISHER_REGISTERED,
            component = COMPONENT,
            topic = %signature,
            publisher,
            keys = %fields::format_keys(&keys),
            "registering publisher"
        );

        let mut state = self.state.lock();
        let publishers = state.publishers.entry(signature.clone()).or_default();
        publishers.register(publisher, keys);
        if publishers.is_empty() {
            state.publishers.remove(&signature);
        }
        Ok(())
    }

    pub fn publish_deregister(&self, header: &MessageHeader) -> Result<()> {
        let publisher = require_address(&header.uri_from, "publisher")?;
        let signature = TopicSignature::from_header(header)?;

        let mut state = self.state.lock();
        let Some(publishers) = state.publishers.get_mut(&signature) else {
            return Ok(());
        };
        let removed = publishers.deregister(publisher);
        if publishers.is_empty() {
            state.publishers.remove(&signature);
        }
        debug!(
            event = events::PUBLISHER_DEREGISTERED,
            component = COMPONENT,
            topic = %signature,
            publisher,
            removed,
            "deregistered publisher"
        );
        Ok(())
    }

    /// Rejects a batch from an unregistered publisher or carrying keys the
    /// publisher never registered.
    pub fn check_publish(&self, header: &MessageHeader, updates: &[PublishedUpdate]) -> Result<()> {
        let publisher = require_address(&header.uri_from, "publisher")?;
        let signature = TopicSignature::from_header(header)?;

        let state = self.state.lock();
        let check = match state.publishers.get(&signature) {
            Some(publishers) => publishers.check(publisher, updates),
            None => PublishCheck::UnknownPublisher,
        };

        match check {
            PublishCheck::Accepted => Ok(()),
            PublishCheck::UnknownPublisher => Err(BrokerError::UnknownEntityKeys {
                publisher: publisher.to_string(),
                keys: updates.iter().map(|update| update.key.clone()).collect(),
            }),
            PublishCheck::UnknownKeys(keys) => Err(BrokerError::UnknownEntityKeys {
                publisher: publisher.to_string(),
                keys,
            }),
        }
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.state.lock().sources.len()
    }

    /// Structured view of every topic, consumer, subscription and publisher.
    pub fn snapshot(&self) -> BrokerReport {
        let state = self.state.lock();
        let signatures: BTreeSet<&TopicSignature> = state
            .sources
            .keys()
            .chain(state.publishers.keys())
            .collect();

        let mut report = BrokerReport::default();
        for signature in signatures {
            let source = state.sources.get(signature);
            let consumers: Vec<ConsumerReport> = source
                .map(|source| {
                    source
                        .consumers()
                        .map(|(address, registry)| ConsumerReport {
                            address: address.clone(),
                            subscriptions: registry
                                .subscriptions()
                                .map(|(subscription_id, filters)| SubscriptionReport {
                                    subscription_id: subscription_id.clone(),
                                    on_all: render_keys(filters.on_all()),
                                    on_change: render_keys(filters.on_change()),
                                })
                                .collect(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            let publishers: Vec<PublisherReport> = state
                .publishers
                .get(signature)
                .map(|source| {
                    source
                        .publishers()
                        .map(|(address, keys)| PublisherReport {
                            address: address.clone(),
                            keys: render_keys(keys),
                        })
                        .collect()
                })
                .unwrap_or_default();

            report.consumer_count += consumers.len();
            report.subscription_count += source
                .map(|source| {
                    source
                        .consumers()
                        .map(|(_, registry)| registry.subscription_count())
                        .sum::<usize>()
                })
                .unwrap_or_default();
            report.publisher_count += publishers.len();
            report.topics.push(TopicReport {
                signature: signature.to_string(),
                consumers,
                publishers,
            });
        }
        report.topic_count = state.sources.len();
        report
    }

    /// Diagnostic dump as pretty-printed JSON.
    pub fn report(&self) -> String {
        self.snapshot().render()
    }

    /// Applies a removal to one topic and prunes the topic when it empties.
    fn remove_from_topic<F>(state: &mut IndexState, signature: &TopicSignature, remove: F) -> usize
    where
        F: FnOnce(&mut SubscriptionSource) -> usize,
    {
        let Some(source) = state.sources.get_mut(signature) else {
            return 0;
        };
        let removed = remove(source);
        if source.is_empty() {
            if let Some(pruned) = state.sources.remove(signature) {
                info!(
                    event = events::TOPIC_PRUNED,
                    component = COMPONENT,
                    topic = %pruned.signature(),
                    "pruned empty subscription source"
                );
            }
        }
        removed
    }
}
