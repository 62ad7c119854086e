//! Publisher key registrations for one topic.

use crate::control_plane::filter_set::KeySet;
use crate::message::PublishedUpdate;
use crate::routing::entity_key::EntityKey;
use std::collections::BTreeMap;

pub(crate) type PublisherId = String;

#[derive(Debug, Default)]
pub(crate) struct PublisherSource {
    publishers: BTreeMap<PublisherId, KeySet>,
}

pub(crate) enum PublishCheck {
    Accepted,
    UnknownPublisher,
    UnknownKeys(Vec<EntityKey>),
}

impl PublisherSource {
    /// Replaces the keys a publisher may publish. An empty set removes the publisher.
    pub(crate) fn register(&mut self, publisher_id: &str, keys: KeySet) {
        if keys.is_empty() {
            self.publishers.remove(publisher_id);
        } else {
            self.publishers.insert(publisher_id.to_string(), keys);
        }
    }

    pub(crate) fn deregister(&mut self, publisher_id: &str) -> bool {
        self.publishers.remove(publisher_id).is_some()
    }

    pub(crate) fn check(&self, publisher_id: &str, updates: &[PublishedUpdate]) -> PublishCheck {
        let Some(registered) = self.publishers.get(publisher_id) else {
            return PublishCheck::UnknownPublisher;
        };

        let unknown: Vec<EntityKey> = updates
            .iter()
            .filter(|update| !registered.iter().any(|key| key.matches(&update.key)))
            .map(|update| update.key.clone())
            .collect();

        if unknown.is_empty() {
            PublishCheck::Accepted
        } else {
            PublishCheck::UnknownKeys(unknown)
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    pub(crate) fn publishers(&self) -> impl Iterator<Item = (&PublisherId, &KeySet)> {
        self.publishers.iter()
    }
}
