//! Lifecycle events published by the state machine
//!
//! Events are broadcast for logging and observation only; nothing in the
//! control loop depends on anyone receiving them.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// Events emitted by the state machine as it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantEvent {
    /// Startup announcement spoken, now idle
    Initialized,

    /// Wake word heard, active session started
    Activated,

    /// A command was dispatched and answered
    CommandHandled {
        /// Intent the command matched
        intent: Intent,
    },

    /// Sleep/exit heard, back to idle
    Standby,
}

impl std::fmt::Display for AssistantEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantEvent::Initialized => write!(f, "INITIALIZED"),
            AssistantEvent::Activated => write!(f, "ACTIVATED"),
            AssistantEvent::CommandHandled { intent } => write!(f, "COMMAND_HANDLED ({})", intent),
            AssistantEvent::Standby => write!(f, "STANDBY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = AssistantEvent::CommandHandled {
            intent: Intent::Weather,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("command_handled"));
        assert!(json.contains("weather"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"standby"}"#;
        let event: AssistantEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, AssistantEvent::Standby);
    }

    #[test]
    fn test_event_display() {
        let event = AssistantEvent::CommandHandled {
            intent: Intent::Search,
        };
        assert_eq!(event.to_string(), "COMMAND_HANDLED (search)");
    }
}
