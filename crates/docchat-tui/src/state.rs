//! Application state.
//!
//! One owned struct; only the reducer mutates it.

use std::collections::HashMap;

use docchat_core::config::Theme;
use docchat_core::models::{Session, SessionId, User};

use crate::common::{TaskId, TaskSeq, Tasks};
use crate::features::document::DocumentContext;
use crate::features::input::InputState;
use crate::features::sessions::SessionStore;
use crate::features::transcript::MessageLog;
use crate::overlays::Overlay;

/// Controller phase, derived from state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoSession,
    SessionActive,
    AwaitingReply,
}

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Sidebar,
    #[default]
    Input,
}

/// A request in flight and the transcript load it was issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub session: SessionId,
    pub generation: u64,
}

/// In-flight chat turns and uploads, keyed by request id.
#[derive(Debug, Default)]
pub struct Pending {
    pub chats: HashMap<TaskId, PendingRequest>,
    pub uploads: HashMap<TaskId, PendingRequest>,
}

impl Pending {
    pub fn chats_for(&self, session: SessionId) -> usize {
        self.chats.values().filter(|r| r.session == session).count()
    }

    pub fn uploads_for(&self, session: SessionId) -> usize {
        self.uploads.values().filter(|r| r.session == session).count()
    }
}

#[derive(Debug)]
pub struct AppState {
    pub user: User,
    pub theme: Theme,
    pub sessions: SessionStore,
    pub active: Option<SessionId>,
    pub transcript: MessageLog,
    pub document: DocumentContext,
    pub input: InputState,
    pub pending: Pending,
    pub tasks: Tasks,
    pub task_seq: TaskSeq,
    pub overlay: Option<Overlay>,
    pub focus: Focus,
    /// Highlighted row in the sidebar.
    pub sidebar_cursor: usize,
    pub status: Option<String>,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(user: User, theme: Theme) -> Self {
        Self {
            user,
            theme,
            sessions: SessionStore::default(),
            active: None,
            transcript: MessageLog::default(),
            document: DocumentContext::default(),
            input: InputState::default(),
            pending: Pending::default(),
            tasks: Tasks::default(),
            task_seq: TaskSeq::default(),
            overlay: None,
            focus: Focus::default(),
            sidebar_cursor: 0,
            status: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.active {
            None => Phase::NoSession,
            Some(id) if self.pending.chats_for(id) > 0 => Phase::AwaitingReply,
            Some(_) => Phase::SessionActive,
        }
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.phase() == Phase::AwaitingReply
    }

    /// The active session's summary, read through the store so renames show.
    pub fn active_session(&self) -> Option<&Session> {
        self.active.and_then(|id| self.sessions.get(id))
    }

    /// True while the active session's upload is being analysed.
    pub fn is_uploading(&self) -> bool {
        self.active
            .is_some_and(|id| self.pending.uploads_for(id) > 0)
    }

    /// Session under the sidebar cursor.
    pub fn highlighted_session(&self) -> Option<&Session> {
        self.sessions.list().get(self.sidebar_cursor)
    }

    pub fn clamp_sidebar_cursor(&mut self) {
        let len = self.sessions.len();
        if len == 0 {
            self.sidebar_cursor = 0;
        } else if self.sidebar_cursor >= len {
            self.sidebar_cursor = len - 1;
        }
    }
}
