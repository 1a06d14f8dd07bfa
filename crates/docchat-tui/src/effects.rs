//! Effects returned by the reducer for the runtime to execute.

use std::path::PathBuf;

use docchat_core::config::Theme;
use docchat_core::models::SessionId;

use crate::common::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Quit,
    LoadSessions {
        task: TaskId,
    },
    CreateSession,
    LoadMessages {
        task: TaskId,
        session_id: SessionId,
    },
    RenameSession {
        session_id: SessionId,
        title: String,
        manual: bool,
    },
    DeleteSession {
        session_id: SessionId,
    },
    DeriveTitle {
        session_id: SessionId,
    },
    SendChat {
        task: TaskId,
        session_id: SessionId,
        text: String,
        document: Option<String>,
    },
    UploadFile {
        task: TaskId,
        session_id: SessionId,
        path: PathBuf,
    },
    PersistTheme(Theme),
    Logout,
}
