//! Commerce events and their payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ORDER_PLACED: &str = "order.placed";
pub const AUTH_PASSWORD_RESET: &str = "auth.password_reset";
pub const INVITE_CREATED: &str = "invite.created";

/// An event emitted by the commerce backend
#[derive(Debug, Clone, Deserialize)]
pub struct CommerceEvent {
    /// Event name (e.g. "order.placed")
    pub name: String,
    /// Event payload
    #[serde(default)]
    pub data: serde_json::Value,
}

impl CommerceEvent {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Order fields needed for the confirmation email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedPayload {
    pub id: String,
    pub email: String,
    pub total: serde_json::Value,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetPayload {
    /// Account identifier, the email address for users
    pub entity_id: String,
    pub token: String,
    #[serde(default)]
    pub actor_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InviteCreatedPayload {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// What the subscriber did with an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventOutcome {
    /// An email was handed to the sender
    Sent {
        template_key: String,
        message_id: Uuid,
    },
    /// The event is known but was not acted on
    Skipped { reason: String },
    /// No subscriber handles this event name
    Unsupported,
}

impl EventOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        EventOutcome::Skipped {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_without_data() {
        let event: CommerceEvent = serde_json::from_value(json!({"name": "order.placed"})).unwrap();
        assert_eq!(event.name, ORDER_PLACED);
        assert!(event.data.is_null());
    }

    #[test]
    fn test_outcome_serialization() {
        let value = serde_json::to_value(EventOutcome::skipped("not enabled")).unwrap();
        assert_eq!(value, json!({"status": "skipped", "reason": "not enabled"}));

        let value = serde_json::to_value(EventOutcome::Unsupported).unwrap();
        assert_eq!(value, json!({"status": "unsupported"}));
    }
}
