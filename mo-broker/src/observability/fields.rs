//! Formatting helpers for structured log fields.

use crate::message::{MessageHeader, OutboundBody, OutboundMessage};
use crate::routing::entity_key::EntityKey;

pub fn format_keys<'a>(keys: impl IntoIterator<Item = &'a EntityKey>) -> String {
    let rendered: Vec<String> = keys.into_iter().map(ToString::to_string).collect();
    format!("{{{}}}", rendered.join(", "))
}

pub fn format_domain(header: &MessageHeader) -> String {
    header.domain.join(".")
}

pub fn format_outbound_kind(message: &OutboundMessage) -> &'static str {
    match message.body {
        OutboundBody::Notify { .. } => "notify",
        OutboundBody::Ack => "ack",
        OutboundBody::Error { .. } => "error",
    }
}

/// Number of updates carried across every notify entry.
pub fn count_updates(message: &OutboundMessage) -> usize {
    message
        .notifications()
        .iter()
        .map(|entry| entry.updates.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::format_keys;
    use crate::routing::entity_key::EntityKey;

    #[test]
    fn keys_render_as_a_set() {
        let keys = [
            EntityKey::new(Some("a"), Some(1), None, None),
            EntityKey::wildcard(),
        ];

        assert_eq!(format_keys(&keys), "{[a.1.*.*], [*.*.*.*]}");
    }
}
