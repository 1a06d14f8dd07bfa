//! Effect handlers.
//!
//! Pure async functions: each performs one backend call and returns the
//! result as a `UiEvent`. The controller spawns them and posts the event to
//! the inbox.

use std::path::PathBuf;
use std::sync::Arc;

use docchat_core::backend::{Backend, BackendError};
use docchat_core::models::{PLACEHOLDER_TITLE, SessionId};
use docchat_core::title::display_name;

use crate::common::TaskId;
use crate::events::{ChatUiEvent, SessionUiEvent, UiEvent};

pub async fn load_sessions<B: Backend>(backend: Arc<B>, user_id: i64, task: TaskId) -> UiEvent {
    match backend.list_sessions(user_id).await {
        Ok(sessions) => UiEvent::Session(SessionUiEvent::ListLoaded { task, sessions }),
        Err(e) => UiEvent::Session(SessionUiEvent::ListFailed {
            task,
            error: e.to_string(),
        }),
    }
}

pub async fn create_session<B: Backend>(backend: Arc<B>, user_id: i64) -> UiEvent {
    match backend.create_session(user_id, PLACEHOLDER_TITLE).await {
        Ok(session) => UiEvent::Session(SessionUiEvent::Created { session }),
        Err(e) => UiEvent::Session(SessionUiEvent::CreateFailed {
            error: e.to_string(),
        }),
    }
}

pub async fn load_messages<B: Backend>(
    backend: Arc<B>,
    task: TaskId,
    session_id: SessionId,
) -> UiEvent {
    match backend.fetch_messages(session_id).await {
        Ok(messages) => UiEvent::Session(SessionUiEvent::MessagesLoaded {
            task,
            session_id,
            messages,
        }),
        Err(e) => UiEvent::Session(SessionUiEvent::MessagesFailed {
            task,
            session_id,
            error: e.to_string(),
        }),
    }
}

pub async fn rename_session<B: Backend>(
    backend: Arc<B>,
    session_id: SessionId,
    title: String,
    manual: bool,
) -> UiEvent {
    match backend.rename_session(session_id, &title).await {
        Ok(()) => UiEvent::Session(SessionUiEvent::Renamed {
            session_id,
            title,
            manual,
        }),
        Err(e) => UiEvent::Session(SessionUiEvent::RenameFailed {
            session_id,
            error: e.to_string(),
            manual,
        }),
    }
}

pub async fn delete_session<B: Backend>(backend: Arc<B>, session_id: SessionId) -> UiEvent {
    match backend.delete_session(session_id).await {
        Ok(()) => UiEvent::Session(SessionUiEvent::Deleted { session_id }),
        Err(e) => UiEvent::Session(SessionUiEvent::DeleteFailed {
            session_id,
            error: e.to_string(),
        }),
    }
}

pub async fn derive_title<B: Backend>(backend: Arc<B>, session_id: SessionId) -> UiEvent {
    match backend.derive_title(session_id).await {
        Ok(title) => UiEvent::Session(SessionUiEvent::TitleDerived { session_id, title }),
        Err(e) => UiEvent::Session(SessionUiEvent::TitleFailed {
            session_id,
            error: e.to_string(),
        }),
    }
}

pub async fn send_chat<B: Backend>(
    backend: Arc<B>,
    user_id: i64,
    task: TaskId,
    session_id: SessionId,
    text: String,
    document: Option<String>,
) -> UiEvent {
    match backend
        .send_chat(user_id, session_id, &text, document.as_deref())
        .await
    {
        Ok(reply) => UiEvent::Chat(ChatUiEvent::ReplyReceived {
            task,
            session_id,
            reply,
        }),
        Err(e) => UiEvent::Chat(ChatUiEvent::ReplyFailed {
            task,
            session_id,
            error: e.to_string(),
        }),
    }
}

pub async fn upload_file<B: Backend>(
    backend: Arc<B>,
    task: TaskId,
    session_id: SessionId,
    path: PathBuf,
) -> UiEvent {
    let file_name = display_name(&path);
    let result = match tokio::fs::read(&path).await {
        Ok(bytes) => backend.upload_file(&file_name, bytes).await,
        Err(source) => Err(BackendError::File { path, source }),
    };
    match result {
        Ok(document) => UiEvent::Chat(ChatUiEvent::UploadSucceeded {
            task,
            session_id,
            file_name,
            document,
        }),
        Err(e) => UiEvent::Chat(ChatUiEvent::UploadFailed {
            task,
            session_id,
            error: e.to_string(),
        }),
    }
}
