//! Stable `event` field values emitted by the broker.

pub const BROKER_CREATED: &str = "broker_created";

pub const TOPIC_CREATED: &str = "topic_created";
pub const TOPIC_PRUNED: &str = "topic_pruned";
pub const SUBSCRIPTION_REGISTERED: &str = "subscription_registered";
pub const SUBSCRIPTION_DEREGISTERED: &str = "subscription_deregistered";
pub const CONSUMER_LOST: &str = "consumer_lost";
pub const PUBLISHER_REGISTERED: &str = "publisher_registered";
pub const PUBLISHER_DEREGISTERED: &str = "publisher_deregistered";
pub const PUBLISH_REJECTED: &str = "publish_rejected";
pub const REQUEST_REJECTED: &str = "request_rejected";

pub const NOTIFY_FAST_PATH_SKIP: &str = "notify_fast_path_skip";
pub const NOTIFY_BUILT: &str = "notify_built";

pub const INGRESS_RECEIVE: &str = "ingress_receive";
pub const INGRESS_REPLY_SKIPPED: &str = "ingress_reply_skipped";

pub const EGRESS_ROUTE_ADDED: &str = "egress_route_added";
pub const EGRESS_ROUTE_REMOVED: &str = "egress_route_removed";
pub const EGRESS_NO_ROUTE: &str = "egress_no_route";
pub const EGRESS_ENQUEUE_FAILED: &str = "egress_enqueue_failed";
pub const EGRESS_WORKER_CREATE_OR_REUSE: &str = "egress_worker_create_or_reuse";
pub const EGRESS_WORKER_RELEASED: &str = "egress_worker_released";
pub const EGRESS_WORKER_LAGGED: &str = "egress_worker_lagged";
pub const EGRESS_WORKER_STOPPED: &str = "egress_worker_stopped";
pub const EGRESS_SEND_ATTEMPT: &str = "egress_send_attempt";
pub const EGRESS_SEND_OK: &str = "egress_send_ok";
pub const EGRESS_SEND_FAILED: &str = "egress_send_failed";
