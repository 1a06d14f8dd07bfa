//! Cross-slice state mutations.
//!
//! The reducer collects the changes one event causes and applies them
//! together, so a transition never leaves slices half-updated.

use docchat_core::models::{Message, Session, SessionId};

#[derive(Debug)]
pub enum StateMutation {
    Sessions(SessionMutation),
    Transcript(TranscriptMutation),
    Document(DocumentMutation),
    Input(InputMutation),
    SetActive(Option<SessionId>),
    SetStatus(Option<String>),
}

#[derive(Debug)]
pub enum SessionMutation {
    /// A list fetch started; record local changes until it lands.
    BeginSync,
    /// The list fetch failed; stop recording.
    EndSync,
    ReplaceAll(Vec<Session>),
    Prepend(Session),
    /// Manual rename confirmed by the server. Ends the in-flight marker.
    Rename { id: SessionId, title: String },
    /// Automatic title; applied only while the title is still the placeholder.
    AutoTitle { id: SessionId, title: String },
    Remove(SessionId),
    BeginRename(SessionId),
    EndRename(SessionId),
    BeginDerive(SessionId),
    EndDerive(SessionId),
}

#[derive(Debug)]
pub enum TranscriptMutation {
    /// Empty the log and expect the history of this session.
    Reset(Option<SessionId>),
    Load {
        session: SessionId,
        messages: Vec<Message>,
    },
    Append(Message),
    LoadFinished,
}

#[derive(Debug)]
pub enum DocumentMutation {
    Clear,
    Set { content: String, display_name: String },
}

#[derive(Debug)]
pub enum InputMutation {
    Clear,
}
