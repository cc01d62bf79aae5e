use serde::{Deserialize, Serialize};

use super::{MessageJson, EVENT_NAME};

/// Snapshot of a message at the moment of creation, fanned out verbatim to
/// every subscriber. Carries no identity beyond the message id inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    pub event: String,
    pub message: MessageJson,
}

impl BroadcastEvent {
    pub fn new(message: MessageJson) -> Self {
        BroadcastEvent {
            event: EVENT_NAME.to_owned(),
            message,
        }
    }
}
