use serde::{Deserialize, Serialize};

/// A named conversation thread owning an ordered set of messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,

    /// Display name shown in the session list
    pub name: String,

    /// Milliseconds since epoch
    pub created_at: i64,

    /// Bumped whenever a message is appended; always >= the newest
    /// message timestamp in the session
    pub updated_at: i64,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub content: String,
    pub role: Role,

    /// Milliseconds since epoch; an assistant reply paired with a user
    /// message is stored at the user timestamp + 1 so ordering never ties
    pub timestamp: i64,

    pub image_path: Option<String>,
    pub audio_path: Option<String>,
}

/// Fields supplied by the caller when appending a message
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub content: String,
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
}

impl NewMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("system"), None);
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
