use integration_test_utils::{header, header_in_domain, init_logging, key, publish_header};
use mo_broker::{
    matches, BrokerIndex, EntityKey, EntityRequest, OutboundMessage, PublishedUpdate, UpdateType,
};
use std::collections::BTreeSet;

const CONSUMER_A: &str = "maltcp://ground/consumer-a";
const CONSUMER_B: &str = "maltcp://ground/consumer-b";
const PUBLISHER: &str = "maltcp://ground/publisher";

fn prefix(first: &str) -> EntityKey {
    EntityKey::new(Some(first), None, None, None)
}

fn update(key: EntityKey, update_type: UpdateType) -> PublishedUpdate {
    PublishedUpdate::new(key, update_type, Vec::new())
}

fn notify(index: &BrokerIndex, updates: &[PublishedUpdate]) -> Vec<OutboundMessage> {
    index
        .create_notify(&publish_header(PUBLISHER), updates)
        .expect("well-formed publish")
}

#[test]
fn on_all_subscription_receives_matching_update() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([prefix("temp")])],
        )
        .expect("register");

    let published = update(key("temp", 1, 2, 3), UpdateType::Modification);
    let notifies = notify(&index, &[published.clone()]);

    assert_eq!(notifies.len(), 1);
    assert_eq!(notifies[0].destination(), CONSUMER_A);
    assert_eq!(notifies[0].notifications().len(), 1);
    let entry = notifies[0].entry("S1").expect("S1 entry");
    assert_eq!(entry.updates, vec![published]);
}

#[test]
fn unrelated_key_produces_no_notify() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([prefix("temp")])],
        )
        .expect("register");

    let notifies = notify(
        &index,
        &[update(key("pressure", 1, 2, 3), UpdateType::Modification)],
    );

    assert!(notifies.is_empty());
}

#[test]
fn on_change_subscription_ignores_creation() {
    init_logging();
    let index = BrokerIndex::new();
    let wildcard_x = EntityKey::new(Some("x"), Some(0), Some(0), Some(0));
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_change([wildcard_x])],
        )
        .expect("register");

    assert!(notify(&index, &[update(key("x", 1, 1, 1), UpdateType::Creation)]).is_empty());
    assert!(notify(&index, &[update(key("x", 1, 1, 1), UpdateType::Deletion)]).is_empty());
    assert!(notify(&index, &[update(key("x", 1, 1, 1), UpdateType::PlainUpdate)]).is_empty());

    let notifies = notify(&index, &[update(key("x", 1, 1, 1), UpdateType::Modification)]);
    assert_eq!(notifies.len(), 1);
    assert_eq!(notifies[0].entry("S1").expect("S1 entry").updates.len(), 1);
}

#[test]
fn two_subscriptions_of_one_consumer_share_one_message() {
    init_logging();
    let index = BrokerIndex::new();
    let k1 = key("temp", 1, 1, 1);
    for subscription_id in ["S1", "S2"] {
        index
            .register(
                &header(CONSUMER_A),
                subscription_id,
                &[EntityRequest::on_all([k1.clone()])],
            )
            .expect("register");
    }

    let published = update(k1, UpdateType::PlainUpdate);
    let notifies = notify(&index, &[published.clone()]);

    assert_eq!(notifies.len(), 1);
    let ids: Vec<&str> = notifies[0]
        .notifications()
        .iter()
        .map(|entry| entry.subscription_id.as_str())
        .collect();
    assert_eq!(ids, vec!["S1", "S2"]);
    for entry in notifies[0].notifications() {
        assert_eq!(entry.updates, vec![published.clone()]);
    }
}

#[test]
fn deregistering_last_subscription_prunes_topic() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([prefix("temp")])],
        )
        .expect("register");
    assert_eq!(index.topic_count(), 1);

    index
        .deregister(&header(CONSUMER_A), &["S1"])
        .expect("deregister");

    assert_eq!(index.topic_count(), 0);
    assert!(index.snapshot().topics.is_empty());
    assert!(!index.snapshot().has_consumer(CONSUMER_A));
}

#[test]
fn full_wildcard_matches_everything_specific_key_does_not() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([EntityKey::new(
                Some("*"),
                Some(0),
                Some(0),
                Some(0),
            )])],
        )
        .expect("register A");
    index
        .register(
            &header(CONSUMER_B),
            "S1",
            &[EntityRequest::on_all([EntityKey::new(
                Some("y"),
                Some(0),
                Some(0),
                Some(0),
            )])],
        )
        .expect("register B");

    let notifies = notify(&index, &[update(key("z", 9, 9, 9), UpdateType::PlainUpdate)]);

    let destinations: Vec<&str> = notifies.iter().map(OutboundMessage::destination).collect();
    assert_eq!(destinations, vec![CONSUMER_A]);
}

#[test]
fn wildcard_matching_law_holds_over_small_domain() {
    let firsts = [None, Some("a"), Some("b")];
    let numbers = [None, Some(1), Some(2)];

    let mut keys = Vec::new();
    for first in firsts {
        for second in numbers {
            for third in numbers {
                for fourth in numbers {
                    keys.push(EntityKey::new(first, second, third, fourth));
                }
            }
        }
    }

    for required in &keys {
        for candidate in &keys {
            let expected = required.first().map_or(true, |slot| Some(slot) == candidate.first())
                && required.second().map_or(true, |slot| Some(slot) == candidate.second())
                && required.third().map_or(true, |slot| Some(slot) == candidate.third())
                && required.fourth().map_or(true, |slot| Some(slot) == candidate.fourth());
            assert_eq!(
                matches(required, candidate),
                expected,
                "required {required}, candidate {candidate}"
            );
        }
    }
}

#[test]
fn re_register_replaces_filters_instead_of_merging() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([prefix("temp")])],
        )
        .expect("first register");
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([prefix("pressure")])],
        )
        .expect("second register");

    assert!(notify(&index, &[update(key("temp", 1, 1, 1), UpdateType::PlainUpdate)]).is_empty());
    assert_eq!(
        notify(
            &index,
            &[update(key("pressure", 1, 1, 1), UpdateType::PlainUpdate)]
        )
        .len(),
        1
    );
}

#[test]
fn fast_path_agrees_with_brute_force_matching() {
    init_logging();
    let index = BrokerIndex::new();
    let subscriptions = [
        (CONSUMER_A, "S1", EntityRequest::on_all([prefix("temp")])),
        (CONSUMER_A, "S2", EntityRequest::on_change([key("volt", 1, 1, 1)])),
        (
            CONSUMER_B,
            "S1",
            EntityRequest::on_all([EntityKey::new(None::<&str>, Some(7), None, None)]),
        ),
    ];
    for (consumer, subscription_id, request) in &subscriptions {
        index
            .register(&header(consumer), subscription_id, std::slice::from_ref(request))
            .expect("register");
    }

    let batches = [
        vec![update(key("pressure", 1, 1, 1), UpdateType::PlainUpdate)],
        vec![update(key("volt", 1, 1, 1), UpdateType::Creation)],
        vec![update(key("volt", 1, 1, 1), UpdateType::Modification)],
        vec![
            update(key("pressure", 7, 1, 1), UpdateType::Creation),
            update(key("temp", 2, 2, 2), UpdateType::Deletion),
        ],
    ];

    for batch in &batches {
        let expected_consumers: BTreeSet<&str> = subscriptions
            .iter()
            .filter(|(_, _, request)| {
                batch.iter().any(|update| {
                    request.keys.iter().any(|key| key.matches(&update.key))
                        && (!request.only_on_change
                            || update.update_type == UpdateType::Modification)
                })
            })
            .map(|(consumer, _, _)| *consumer)
            .collect();

        let notifies = notify(&index, batch);
        let actual_consumers: BTreeSet<&str> =
            notifies.iter().map(OutboundMessage::destination).collect();

        assert_eq!(actual_consumers, expected_consumers, "batch {batch:?}");
        assert_eq!(
            actual_consumers.len(),
            notifies.len(),
            "at most one message per consumer"
        );
    }
}

#[test]
fn notify_carries_publisher_header_fields() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([EntityKey::wildcard()])],
        )
        .expect("register");

    let mut publish = publish_header(PUBLISHER);
    publish.transaction_id = 42;
    publish.timestamp = 1_700_000_000;
    let notifies = index
        .create_notify(&publish, &[update(key("temp", 1, 1, 1), UpdateType::PlainUpdate)])
        .expect("publish");

    let header = &notifies[0].header;
    assert_eq!(header.uri_from, PUBLISHER);
    assert_eq!(header.uri_to, CONSUMER_A);
    assert_eq!(header.transaction_id, 42);
    assert_eq!(header.timestamp, 1_700_000_000);
    assert_eq!(header.domain, publish.domain);
}

#[test]
fn topics_are_isolated_by_signature() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header_in_domain(CONSUMER_A, &["esa", "other"]),
            "S1",
            &[EntityRequest::on_all([EntityKey::wildcard()])],
        )
        .expect("register");

    assert!(notify(&index, &[update(key("temp", 1, 1, 1), UpdateType::PlainUpdate)]).is_empty());
    assert_eq!(index.topic_count(), 1);
}

#[test]
fn malformed_requests_leave_index_untouched() {
    init_logging();
    let index = BrokerIndex::new();

    assert!(index
        .register(&header(""), "S1", &[EntityRequest::on_all([prefix("temp")])])
        .is_err());
    assert!(index
        .register(&header(CONSUMER_A), "", &[EntityRequest::on_all([prefix("temp")])])
        .is_err());
    assert!(index
        .register(
            &header_in_domain(CONSUMER_A, &[]),
            "S1",
            &[EntityRequest::on_all([prefix("temp")])]
        )
        .is_err());

    assert_eq!(index.topic_count(), 0);
}

#[test]
fn unknown_ids_on_deregister_are_skipped() {
    init_logging();
    let index = BrokerIndex::new();
    for subscription_id in ["S1", "S2"] {
        index
            .register(
                &header(CONSUMER_A),
                subscription_id,
                &[EntityRequest::on_all([prefix("temp")])],
            )
            .expect("register");
    }

    index
        .deregister(&header(CONSUMER_A), &["missing", "S1"])
        .expect("deregister");

    let report = index.snapshot();
    assert_eq!(report.subscription_count, 1);
    assert_eq!(
        report.topics[0].consumers[0].subscriptions[0].subscription_id,
        "S2"
    );
}

#[test]
fn lost_consumer_is_removed_from_one_topic_only() {
    init_logging();
    let index = BrokerIndex::new();
    let other_domain = ["esa", "other"];
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[EntityRequest::on_all([EntityKey::wildcard()])],
        )
        .expect("register");
    index
        .register(
            &header_in_domain(CONSUMER_A, &other_domain),
            "S1",
            &[EntityRequest::on_all([EntityKey::wildcard()])],
        )
        .expect("register");
    index
        .register(
            &header(CONSUMER_B),
            "S1",
            &[EntityRequest::on_all([EntityKey::wildcard()])],
        )
        .expect("register");

    let lost = publish_header(PUBLISHER).notify_to(CONSUMER_A);
    index.remove_lost_consumer(&lost).expect("remove lost");
    index.remove_lost_consumer(&lost).expect("second removal is a no-op");

    let destinations: Vec<String> = notify(
        &index,
        &[update(key("temp", 1, 1, 1), UpdateType::PlainUpdate)],
    )
    .iter()
    .map(|notify| notify.destination().to_string())
    .collect();
    assert_eq!(destinations, vec![CONSUMER_B.to_string()]);
    assert_eq!(index.topic_count(), 2);
}

#[test]
fn report_shows_registrations() {
    init_logging();
    let index = BrokerIndex::new();
    index
        .register(
            &header(CONSUMER_A),
            "S1",
            &[
                EntityRequest::on_all([prefix("temp")]),
                EntityRequest::on_change([key("volt", 1, 2, 3)]),
            ],
        )
        .expect("register");

    let report = index.report();

    assert!(report.contains(CONSUMER_A));
    assert!(report.contains("S1"));
    assert!(report.contains("[temp.*.*.*]"));
    assert!(report.contains("[volt.1.2.3]"));
}
