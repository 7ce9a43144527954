//! Inbound wire-frame decoding.
//!
//! The relay speaks two frame shapes on one text stream: a JSON history
//! envelope sent once right after the connection opens, and bare text lines
//! for everything else.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Structured payloads the relay can send.
///
/// Externally tagged by a `type` field; any frame that does not decode to a
/// known variant is a plain live line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Prior conversation replayed once on join, oldest first.
    History { messages: Vec<String> },
}

/// Decode one inbound frame into the messages it carries.
///
/// A history envelope yields one historical message per entry, in envelope
/// order. Any frame that fails the envelope decode — not JSON, wrong `type`,
/// missing fields — is a single live line with its text unmodified. Decode
/// failure is the normal path for live traffic, not an error.
///
/// A live line that happens to be valid envelope JSON is indistinguishable
/// from a history burst and will be replayed as one.
#[must_use]
pub fn parse_frame(raw: &str, viewer: &str) -> Vec<Message> {
    match serde_json::from_str::<Envelope>(raw) {
        Ok(Envelope::History { messages }) => {
            tracing::debug!(count = messages.len(), "replaying history");
            messages
                .into_iter()
                .map(|text| Message::classified(text, viewer, true))
                .collect()
        }
        Err(_) => vec![Message::classified(raw.to_owned(), viewer, false)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageOrigin;

    #[test]
    fn history_envelope_yields_entries_in_order() {
        let raw = r#"{"type": "history", "messages": ["alice: one", "bob: two", "motd"]}"#;
        let messages = parse_frame(raw, "alice");

        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.historical));
        assert_eq!(messages[0].text, "alice: one");
        assert_eq!(messages[0].origin, MessageOrigin::Own);
        assert_eq!(messages[1].text, "bob: two");
        assert_eq!(messages[1].origin, MessageOrigin::Other);
        assert_eq!(messages[2].origin, MessageOrigin::System);
    }

    #[test]
    fn empty_history_yields_nothing() {
        let messages = parse_frame(r#"{"type": "history", "messages": []}"#, "alice");
        assert!(messages.is_empty());
    }

    #[test]
    fn plain_line_is_one_live_message() {
        let messages = parse_frame("bob: hello", "alice");

        assert_eq!(messages.len(), 1);
        assert!(!messages[0].historical);
        assert_eq!(messages[0].text, "bob: hello");
        assert_eq!(messages[0].origin, MessageOrigin::Other);
    }

    #[test]
    fn unknown_type_falls_back_to_live_line() {
        let raw = r#"{"type": "presence", "messages": ["x"]}"#;
        let messages = parse_frame(raw, "alice");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, raw);
        assert!(!messages[0].historical);
    }

    #[test]
    fn malformed_json_falls_back_to_live_line() {
        let raw = r#"{"type": "history", "messages": ["#;
        let messages = parse_frame(raw, "alice");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, raw);
    }

    #[test]
    fn envelope_missing_messages_falls_back_to_live_line() {
        let messages = parse_frame(r#"{"type": "history"}"#, "alice");
        assert_eq!(messages.len(), 1);
    }

    // A participant typing literal envelope JSON gets replayed as history.
    #[test]
    fn live_line_shaped_like_an_envelope_is_taken_as_one() {
        let messages = parse_frame(r#"{"type":"history","messages":["fake"]}"#, "alice");

        assert_eq!(messages.len(), 1);
        assert!(messages[0].historical);
        assert_eq!(messages[0].text, "fake");
    }

    #[test]
    fn parsing_is_pure() {
        let raw = r#"{"type": "history", "messages": ["a: x", "b: y"]}"#;
        assert_eq!(parse_frame(raw, "a"), parse_frame(raw, "a"));
        assert_eq!(parse_frame("b: y", "a"), parse_frame("b: y", "a"));
    }

    #[test]
    fn envelope_serializes_with_type_tag() {
        let envelope = Envelope::History {
            messages: vec!["a: x".to_owned()],
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""type":"history""#));
    }
}
