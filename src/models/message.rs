// SPDX-License-Identifier: MIT

//! Conversation messages between users and trainers.

use serde::{Deserialize, Serialize};

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    User,
    Trainer,
    System,
}

/// One message in a user–trainer conversation thread.
///
/// Append-only, ordered by timestamp ascending; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    /// `"{user_id}#{trainer_id}"`
    pub conversation_id: String,
    /// When the message was sent (RFC3339)
    pub timestamp: String,
    pub user_id: String,
    pub trainer_id: String,
    pub sender_role: SenderRole,
    pub message: String,
    /// Marker for system-generated messages ("daily_summary")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Build the conversation document key for a user–trainer pair.
pub fn conversation_id(user_id: &str, trainer_id: &str) -> String {
    format!("{}#{}", user_id, trainer_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_format() {
        assert_eq!(conversation_id("u1", "t9"), "u1#t9");
    }

    #[test]
    fn test_sender_role_wire_names() {
        assert_eq!(serde_json::to_string(&SenderRole::System).unwrap(), "\"system\"");
        assert_eq!(
            serde_json::from_str::<SenderRole>("\"trainer\"").unwrap(),
            SenderRole::Trainer
        );
    }
}
