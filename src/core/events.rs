//! Semantic events produced by scheduler callbacks

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::EntityId;

/// An event emitted by a daemon, fuse or plugin.
///
/// The scheduler only forwards these to the host; `event_type` and `data`
/// are meaningful to the narration layer, not to the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SemanticEvent {
    pub id: Uuid,
    pub event_type: String,
    pub entities: Vec<EntityId>,
    pub data: serde_json::Value,
}

impl SemanticEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            entities: Vec::new(),
            data: serde_json::Value::Null,
        }
    }

    /// Shorthand for a narration event carrying a single message id
    pub fn message(message_id: impl Into<String>) -> Self {
        Self::new("message").with_data(serde_json::json!({ "messageId": message_id.into() }))
    }

    pub fn with_entity(mut self, entity: impl Into<EntityId>) -> Self {
        self.entities.push(entity.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// The `messageId` carried by a message event, if any
    pub fn message_id(&self) -> Option<&str> {
        self.data.get("messageId").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_event() {
        let event = SemanticEvent::message("dungeo.lamp.dim").with_entity("lamp");
        assert_eq!(event.event_type, "message");
        assert_eq!(event.message_id(), Some("dungeo.lamp.dim"));
        assert_eq!(event.entities, vec!["lamp".to_string()]);
    }

    #[test]
    fn test_events_get_distinct_ids() {
        let a = SemanticEvent::new("x");
        let b = SemanticEvent::new("x");
        assert_ne!(a.id, b.id);
    }
}
