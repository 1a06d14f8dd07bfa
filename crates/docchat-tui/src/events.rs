//! UI events.
//!
//! Everything that can change `AppState` arrives here: terminal input, user
//! actions, and results of effects executed by the runtime.

use std::path::PathBuf;

use crossterm::event::Event;
use docchat_core::models::{Message, Session, SessionId, UploadedDocument};

use crate::common::TaskId;

#[derive(Debug)]
pub enum UiEvent {
    Tick,
    Terminal(Event),
    Action(UserAction),
    Session(SessionUiEvent),
    Chat(ChatUiEvent),
}

/// Intentional user operations, decoded from keys or overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    CreateSession,
    SelectSession(SessionId),
    RenameSession { id: SessionId, title: String },
    DeleteSession(SessionId),
    SendMessage(String),
    /// `None` when the picker was dismissed without a file.
    UploadFile(Option<PathBuf>),
    ToggleTheme,
    Logout,
    Quit,
}

/// Results of session CRUD and history loads.
#[derive(Debug)]
pub enum SessionUiEvent {
    ListLoaded {
        task: TaskId,
        sessions: Vec<Session>,
    },
    ListFailed {
        task: TaskId,
        error: String,
    },
    Created {
        session: Session,
    },
    CreateFailed {
        error: String,
    },
    MessagesLoaded {
        task: TaskId,
        session_id: SessionId,
        messages: Vec<Message>,
    },
    MessagesFailed {
        task: TaskId,
        session_id: SessionId,
        error: String,
    },
    Renamed {
        session_id: SessionId,
        title: String,
        /// False for automatic titles being persisted.
        manual: bool,
    },
    RenameFailed {
        session_id: SessionId,
        error: String,
        manual: bool,
    },
    Deleted {
        session_id: SessionId,
    },
    DeleteFailed {
        session_id: SessionId,
        error: String,
    },
    TitleDerived {
        session_id: SessionId,
        title: Option<String>,
    },
    TitleFailed {
        session_id: SessionId,
        error: String,
    },
}

/// Results of chat turns and uploads, tagged with the issuing session.
#[derive(Debug)]
pub enum ChatUiEvent {
    ReplyReceived {
        task: TaskId,
        session_id: SessionId,
        reply: String,
    },
    ReplyFailed {
        task: TaskId,
        session_id: SessionId,
        error: String,
    },
    UploadSucceeded {
        task: TaskId,
        session_id: SessionId,
        file_name: String,
        document: UploadedDocument,
    },
    UploadFailed {
        task: TaskId,
        session_id: SessionId,
        error: String,
    },
}
