//! Message model and display classification.

use serde::{Deserialize, Serialize};

/// Display category assigned to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOrigin {
    /// Sent by the viewer.
    Own,
    /// Sent by another participant.
    Other,
    /// Connection notices and other non-chat lines.
    System,
}

/// One rendered chat line.
///
/// Immutable once constructed; the origin is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Line text, exactly as received.
    pub text: String,
    /// Display category.
    pub origin: MessageOrigin,
    /// True when the line came from the one-time history replay.
    pub historical: bool,
}

impl Message {
    /// Build a message classified against the viewer's identity.
    #[must_use]
    pub fn classified(text: String, viewer: &str, historical: bool) -> Self {
        let origin = classify(&text, viewer);
        Self {
            text,
            origin,
            historical,
        }
    }

    /// Build a synthetic system notice.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: MessageOrigin::System,
            historical: false,
        }
    }
}

/// Classify a raw line against the viewer's identity.
///
/// The sender is not a structural field on this wire; lines are matched by
/// the `"name: "` convention. An identity that is a prefix of another, or a
/// notice that contains `": "`, lands in the wrong category.
#[must_use]
pub fn classify(text: &str, viewer: &str) -> MessageOrigin {
    let own = text
        .strip_prefix(viewer)
        .is_some_and(|rest| rest.starts_with(": "));

    if own {
        MessageOrigin::Own
    } else if text.contains(": ") {
        MessageOrigin::Other
    } else {
        MessageOrigin::System
    }
}
