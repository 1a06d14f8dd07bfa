//! Domain types shared by the client, the UI and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title every new session starts with.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

/// Bot message shown when a chat turn fails.
pub const CHAT_FAILED_TEXT: &str = "Error: Could not get response";

/// Bot message shown when a file upload fails.
pub const UPLOAD_FAILED_TEXT: &str = "Error: Could not analyze file";

/// Authenticated user, immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// Backend-assigned session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session summary; never holds message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    /// True while the title is still the creation-time sentinel.
    pub title_is_placeholder: bool,
    pub created_at: Option<String>,
}

impl Session {
    /// A freshly created session carrying `title`.
    pub fn new(id: SessionId, title: impl Into<String>) -> Self {
        let title = title.into();
        let title_is_placeholder = title == PLACEHOLDER_TITLE;
        Self {
            id,
            title,
            title_is_placeholder,
            created_at: None,
        }
    }

    /// A session reloaded from the backend.
    ///
    /// The backend stores no placeholder flag, so a stored title that equals
    /// the sentinel is treated as a placeholder even if a user chose it.
    pub fn from_stored(id: SessionId, title: String, created_at: Option<String>) -> Self {
        Self {
            created_at,
            ..Self::new(id, title)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One chat turn. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Result of a successful file analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Extracted text, attached to later chat turns.
    pub content: String,
    /// The backend's analysis, shown as a bot message.
    pub analysis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_with_sentinel_is_placeholder() {
        let session = Session::new(SessionId(1), PLACEHOLDER_TITLE);
        assert!(session.title_is_placeholder);

        let named = Session::new(SessionId(2), "Budget review");
        assert!(!named.title_is_placeholder);
    }

    #[test]
    fn test_stored_session_with_sentinel_title_counts_as_placeholder() {
        let session = Session::from_stored(
            SessionId(3),
            "New Chat".to_string(),
            Some("2024-01-01 10:00:00".to_string()),
        );
        assert!(session.title_is_placeholder);
        assert_eq!(session.created_at.as_deref(), Some("2024-01-01 10:00:00"));
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
        assert_eq!(
            serde_json::from_str::<Sender>("\"user\"").unwrap(),
            Sender::User
        );
    }
}
