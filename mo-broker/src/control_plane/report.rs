//! Diagnostic snapshot of the broker index.

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BrokerReport {
    pub topic_count: usize,
    pub consumer_count: usize,
    pub subscription_count: usize,
    pub publisher_count: usize,
    pub topics: Vec<TopicReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicReport {
    pub signature: String,
    pub consumers: Vec<ConsumerReport>,
    pub publishers: Vec<PublisherReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConsumerReport {
    pub address: String,
    pub subscriptions: Vec<SubscriptionReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubscriptionReport {
    pub subscription_id: String,
    pub on_all: Vec<String>,
    pub on_change: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PublisherReport {
    pub address: String,
    pub keys: Vec<String>,
}

impl BrokerReport {
    /// Whether a consumer holds any subscription under any topic.
    pub fn has_consumer(&self, address: &str) -> bool {
        self.topics
            .iter()
            .flat_map(|topic| topic.consumers.iter())
            .any(|consumer| consumer.address == address)
    }

    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|err| format!("{{\"error\": \"unable to render report: {err}\"}}"))
    }
}
