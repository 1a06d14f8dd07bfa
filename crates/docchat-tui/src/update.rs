//! Reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use docchat_core::models::{CHAT_FAILED_TEXT, Message, SessionId, UPLOAD_FAILED_TEXT};
use docchat_core::title::{display_name, file_title, normalize_title, upload_notice};
use tracing::{debug, info, warn};

use crate::common::TaskId;
use crate::effects::UiEffect;
use crate::events::{ChatUiEvent, SessionUiEvent, UiEvent, UserAction};
use crate::mutations::{
    DocumentMutation, InputMutation, SessionMutation, StateMutation, TranscriptMutation,
};
use crate::overlays::{
    ConfirmDeleteState, FilePickerState, Overlay, OverlayTransition, RenameState,
};
use crate::state::{AppState, Focus, PendingRequest};

/// Lines moved per PageUp/PageDown.
const SCROLL_STEP: usize = 10;

/// Effects to run once at startup.
pub fn init(app: &mut AppState) -> Vec<UiEffect> {
    let task = app.task_seq.next_id();
    app.tasks.session_list.start(task);
    apply_mutations(
        app,
        vec![
            StateMutation::Sessions(SessionMutation::BeginSync),
            StateMutation::SetStatus(Some("Loading sessions…".to_string())),
        ],
    );
    vec![UiEffect::LoadSessions { task }]
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, &term_event),
        UiEvent::Action(action) => handle_action(app, action),
        UiEvent::Session(event) => handle_session_event(app, event),
        UiEvent::Chat(event) => handle_chat_event(app, event),
    }
}

// ============================================================================
// User actions
// ============================================================================

fn handle_action(app: &mut AppState, action: UserAction) -> Vec<UiEffect> {
    match action {
        UserAction::CreateSession => {
            app.status = Some("Creating session…".to_string());
            vec![UiEffect::CreateSession]
        }
        UserAction::SelectSession(id) => select_session(app, id),
        UserAction::RenameSession { id, title } => rename_session(app, id, &title),
        UserAction::DeleteSession(id) => {
            if !app.sessions.contains(id) {
                debug!(session = %id, "delete for unknown session ignored");
                return vec![];
            }
            vec![UiEffect::DeleteSession { session_id: id }]
        }
        UserAction::SendMessage(text) => send_message(app, text),
        UserAction::UploadFile(path) => {
            let Some(path) = path else {
                return vec![];
            };
            upload_file(app, path)
        }
        UserAction::ToggleTheme => {
            app.theme = app.theme.toggled();
            vec![UiEffect::PersistTheme(app.theme)]
        }
        UserAction::Logout => vec![UiEffect::Logout],
        UserAction::Quit => vec![UiEffect::Quit],
    }
}

fn select_session(app: &mut AppState, id: SessionId) -> Vec<UiEffect> {
    let Some(index) = app.sessions.index_of(id) else {
        debug!(session = %id, "select for unknown session ignored");
        return vec![];
    };
    app.sidebar_cursor = index;
    app.focus = Focus::Input;

    let task = app.task_seq.next_id();
    app.tasks.message_load.start(task);
    apply_mutations(
        app,
        vec![
            StateMutation::SetActive(Some(id)),
            StateMutation::Transcript(TranscriptMutation::Reset(Some(id))),
            StateMutation::Document(DocumentMutation::Clear),
            StateMutation::SetStatus(None),
        ],
    );
    vec![UiEffect::LoadMessages {
        task,
        session_id: id,
    }]
}

fn rename_session(app: &mut AppState, id: SessionId, title: &str) -> Vec<UiEffect> {
    let Some(title) = normalize_title(title) else {
        app.status = Some("Title cannot be empty".to_string());
        return vec![];
    };
    if !app.sessions.contains(id) {
        debug!(session = %id, "rename for unknown session ignored");
        return vec![];
    }
    apply_mutations(
        app,
        vec![StateMutation::Sessions(SessionMutation::BeginRename(id))],
    );
    vec![UiEffect::RenameSession {
        session_id: id,
        title,
        manual: true,
    }]
}

fn send_message(app: &mut AppState, text: String) -> Vec<UiEffect> {
    if text.trim().is_empty() {
        return vec![];
    }
    let Some(session_id) = app.active else {
        return vec![];
    };
    if app.transcript.is_loading() {
        app.status = Some("Messages are still loading".to_string());
        return vec![];
    }

    let task = app.task_seq.next_id();
    app.pending.chats.insert(task, request_for(app, session_id));
    let document = app.document.attachment().map(str::to_string);
    apply_mutations(
        app,
        vec![
            StateMutation::Transcript(TranscriptMutation::Append(Message::user(text.clone()))),
            StateMutation::Input(InputMutation::Clear),
        ],
    );
    vec![UiEffect::SendChat {
        task,
        session_id,
        text,
        document,
    }]
}

fn upload_file(app: &mut AppState, path: PathBuf) -> Vec<UiEffect> {
    let Some(session_id) = app.active else {
        app.status = Some("Select or create a session first".to_string());
        return vec![];
    };
    if app.transcript.is_loading() {
        app.status = Some("Messages are still loading".to_string());
        return vec![];
    }

    let name = display_name(&path);
    let task = app.task_seq.next_id();
    app.pending.uploads.insert(task, request_for(app, session_id));
    apply_mutations(
        app,
        vec![StateMutation::Transcript(TranscriptMutation::Append(
            Message::user(upload_notice(&name)),
        ))],
    );
    vec![UiEffect::UploadFile {
        task,
        session_id,
        path,
    }]
}

// ============================================================================
// Session results
// ============================================================================

fn handle_session_event(app: &mut AppState, event: SessionUiEvent) -> Vec<UiEffect> {
    match event {
        SessionUiEvent::ListLoaded { task, sessions } => {
            if !app.tasks.session_list.finish_if_active(task) {
                return vec![];
            }
            info!(count = sessions.len(), "sessions loaded");
            apply_mutations(
                app,
                vec![
                    StateMutation::Sessions(SessionMutation::ReplaceAll(sessions)),
                    StateMutation::SetStatus(None),
                ],
            );
            if let Some(id) = app.active
                && !app.sessions.contains(id)
            {
                clear_active(app);
            }
            app.clamp_sidebar_cursor();
            vec![]
        }
        SessionUiEvent::ListFailed { task, error } => {
            if app.tasks.session_list.finish_if_active(task) {
                warn!(%error, "failed to load sessions");
                apply_mutations(
                    app,
                    vec![
                        StateMutation::Sessions(SessionMutation::EndSync),
                        StateMutation::SetStatus(Some(format!(
                            "Could not load sessions: {error}"
                        ))),
                    ],
                );
            }
            vec![]
        }
        SessionUiEvent::Created { session } => {
            let id = session.id;
            info!(session = %id, "session created");
            app.tasks.message_load.clear();
            apply_mutations(
                app,
                vec![
                    StateMutation::Sessions(SessionMutation::Prepend(session)),
                    StateMutation::SetActive(Some(id)),
                    StateMutation::Transcript(TranscriptMutation::Reset(Some(id))),
                    StateMutation::Transcript(TranscriptMutation::LoadFinished),
                    StateMutation::Document(DocumentMutation::Clear),
                    StateMutation::SetStatus(None),
                ],
            );
            app.sidebar_cursor = 0;
            app.focus = Focus::Input;
            vec![]
        }
        SessionUiEvent::CreateFailed { error } => {
            warn!(%error, "failed to create session");
            app.status = Some(format!("Could not create session: {error}"));
            vec![]
        }
        SessionUiEvent::MessagesLoaded {
            task,
            session_id,
            messages,
        } => {
            if !app.tasks.message_load.finish_if_active(task) {
                debug!(session = %session_id, "superseded history load discarded");
                return vec![];
            }
            apply_mutations(
                app,
                vec![StateMutation::Transcript(TranscriptMutation::Load {
                    session: session_id,
                    messages,
                })],
            );
            vec![]
        }
        SessionUiEvent::MessagesFailed {
            task,
            session_id,
            error,
        } => {
            if !app.tasks.message_load.finish_if_active(task) {
                return vec![];
            }
            warn!(session = %session_id, %error, "failed to load messages");
            if app.transcript.belongs_to(session_id) {
                apply_mutations(
                    app,
                    vec![
                        StateMutation::Transcript(TranscriptMutation::LoadFinished),
                        StateMutation::SetStatus(Some(format!(
                            "Could not load messages: {error}"
                        ))),
                    ],
                );
            }
            vec![]
        }
        SessionUiEvent::Renamed {
            session_id,
            title,
            manual,
        } => {
            if manual {
                apply_mutations(
                    app,
                    vec![StateMutation::Sessions(SessionMutation::Rename {
                        id: session_id,
                        title,
                    })],
                );
            } else {
                debug!(session = %session_id, "automatic title persisted");
            }
            vec![]
        }
        SessionUiEvent::RenameFailed {
            session_id,
            error,
            manual,
        } => {
            warn!(session = %session_id, %error, manual, "failed to rename session");
            if manual {
                apply_mutations(
                    app,
                    vec![
                        StateMutation::Sessions(SessionMutation::EndRename(session_id)),
                        StateMutation::SetStatus(Some(format!("Rename failed: {error}"))),
                    ],
                );
            }
            vec![]
        }
        SessionUiEvent::Deleted { session_id } => {
            info!(session = %session_id, "session deleted");
            apply_mutations(
                app,
                vec![StateMutation::Sessions(SessionMutation::Remove(session_id))],
            );
            if app.active == Some(session_id) {
                clear_active(app);
            }
            app.clamp_sidebar_cursor();
            vec![]
        }
        SessionUiEvent::DeleteFailed { session_id, error } => {
            warn!(session = %session_id, %error, "failed to delete session");
            app.status = Some(format!("Delete failed: {error}"));
            vec![]
        }
        SessionUiEvent::TitleDerived { session_id, title } => {
            let mut mutations = vec![StateMutation::Sessions(SessionMutation::EndDerive(
                session_id,
            ))];
            let mut effects = vec![];
            if let Some(title) = title {
                if app.sessions.needs_auto_title(session_id) {
                    mutations.push(StateMutation::Sessions(SessionMutation::AutoTitle {
                        id: session_id,
                        title,
                    }));
                } else if app.sessions.is_renaming(session_id) {
                    warn!(
                        session = %session_id,
                        "derived title stored while a manual rename is in flight"
                    );
                } else if let Some(session) = app.sessions.get(session_id)
                    && session.title != title
                {
                    // The server stored the derived title; restore the one shown.
                    effects.push(UiEffect::RenameSession {
                        session_id,
                        title: session.title.clone(),
                        manual: false,
                    });
                }
            }
            apply_mutations(app, mutations);
            effects
        }
        SessionUiEvent::TitleFailed { session_id, error } => {
            debug!(session = %session_id, %error, "title derivation failed");
            apply_mutations(
                app,
                vec![StateMutation::Sessions(SessionMutation::EndDerive(
                    session_id,
                ))],
            );
            vec![]
        }
    }
}

/// Clears the active session together with its log and document.
fn clear_active(app: &mut AppState) {
    app.tasks.message_load.clear();
    apply_mutations(
        app,
        vec![
            StateMutation::SetActive(None),
            StateMutation::Transcript(TranscriptMutation::Reset(None)),
            StateMutation::Document(DocumentMutation::Clear),
        ],
    );
}

// ============================================================================
// Chat results
// ============================================================================

fn request_for(app: &AppState, session: SessionId) -> PendingRequest {
    PendingRequest {
        session,
        generation: app.transcript.generation(),
    }
}

/// Whether a result may touch the transcript: its session is still shown and
/// the log has not been reloaded since the request was issued.
fn is_displayed(app: &AppState, request: PendingRequest) -> bool {
    app.active == Some(request.session)
        && app.transcript.belongs_to(request.session)
        && app.transcript.generation() == request.generation
}

fn handle_chat_event(app: &mut AppState, event: ChatUiEvent) -> Vec<UiEffect> {
    match event {
        ChatUiEvent::ReplyReceived {
            task,
            session_id,
            reply,
        } => finish_chat(app, task, session_id, Ok(reply)),
        ChatUiEvent::ReplyFailed {
            task,
            session_id,
            error,
        } => finish_chat(app, task, session_id, Err(error)),
        ChatUiEvent::UploadSucceeded {
            task,
            session_id,
            file_name,
            document,
        } => {
            let Some(request) = app.pending.uploads.remove(&task) else {
                return vec![];
            };
            let mut mutations = vec![];
            let mut effects = vec![];
            if is_displayed(app, request) {
                mutations.push(StateMutation::Document(DocumentMutation::Set {
                    content: document.content,
                    display_name: file_name.clone(),
                }));
                mutations.push(StateMutation::Transcript(TranscriptMutation::Append(
                    Message::bot(document.analysis),
                )));
            } else {
                debug!(session = %session_id, "upload result for inactive session not shown");
            }
            if app.sessions.needs_auto_title(session_id) {
                let title = file_title(&file_name);
                mutations.push(StateMutation::Sessions(SessionMutation::AutoTitle {
                    id: session_id,
                    title: title.clone(),
                }));
                effects.push(UiEffect::RenameSession {
                    session_id,
                    title,
                    manual: false,
                });
            }
            apply_mutations(app, mutations);
            effects
        }
        ChatUiEvent::UploadFailed {
            task,
            session_id,
            error,
        } => {
            let Some(request) = app.pending.uploads.remove(&task) else {
                return vec![];
            };
            warn!(session = %session_id, %error, "upload failed");
            if is_displayed(app, request) {
                apply_mutations(
                    app,
                    vec![StateMutation::Transcript(TranscriptMutation::Append(
                        Message::bot(UPLOAD_FAILED_TEXT),
                    ))],
                );
            }
            vec![]
        }
    }
}

fn finish_chat(
    app: &mut AppState,
    task: TaskId,
    session_id: SessionId,
    outcome: Result<String, String>,
) -> Vec<UiEffect> {
    let Some(request) = app.pending.chats.remove(&task) else {
        return vec![];
    };
    let succeeded = outcome.is_ok();
    let text = outcome.unwrap_or_else(|error| {
        warn!(session = %session_id, %error, "chat request failed");
        CHAT_FAILED_TEXT.to_string()
    });

    let mut mutations = vec![];
    let mut effects = vec![];
    if is_displayed(app, request) {
        mutations.push(StateMutation::Transcript(TranscriptMutation::Append(
            Message::bot(text),
        )));
        mutations.push(StateMutation::Input(InputMutation::Clear));
    } else {
        debug!(session = %session_id, "reply for inactive session not shown");
    }
    if succeeded && app.sessions.should_derive_title(session_id) {
        mutations.push(StateMutation::Sessions(SessionMutation::BeginDerive(
            session_id,
        )));
        effects.push(UiEffect::DeriveTitle { session_id });
    }
    apply_mutations(app, mutations);
    effects
}

// ============================================================================
// Terminal input
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: &Event) -> Vec<UiEffect> {
    if let Some(overlay) = app.overlay.as_mut() {
        return match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let update = overlay.handle_key(*key);
                if update.transition == OverlayTransition::Close {
                    app.overlay = None;
                }
                update
                    .action
                    .map(|action| handle_action(app, action))
                    .unwrap_or_default()
            }
            Event::Paste(_) => {
                if let Overlay::FilePicker(picker) = overlay {
                    picker.handle_paste(event);
                }
                vec![]
            }
            _ => vec![],
        };
    }

    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, *key),
        Event::Paste(text) => {
            if input_enabled(app) {
                app.input.buffer.insert_str(text);
            }
            vec![]
        }
        _ => vec![],
    }
}

/// Typing is gated while the active session awaits a reply.
fn input_enabled(app: &AppState) -> bool {
    app.active.is_some() && !app.is_awaiting_reply()
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        match key.code {
            KeyCode::Char('c' | 'q') => return handle_action(app, UserAction::Quit),
            KeyCode::Char('n') => return handle_action(app, UserAction::CreateSession),
            KeyCode::Char('t') => return handle_action(app, UserAction::ToggleTheme),
            KeyCode::Char('l') => return handle_action(app, UserAction::Logout),
            KeyCode::Char('o') => {
                if app.active.is_some() {
                    app.overlay = Some(Overlay::FilePicker(FilePickerState::open()));
                } else {
                    app.status = Some("Select or create a session first".to_string());
                }
                return vec![];
            }
            KeyCode::Char('r') => {
                if let Some(session) = app.active_session() {
                    app.overlay = Some(Overlay::Rename(RenameState::open(
                        session.id,
                        &session.title,
                    )));
                }
                return vec![];
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Input,
                Focus::Input => Focus::Sidebar,
            };
            return vec![];
        }
        KeyCode::PageUp => {
            app.transcript.scroll_up(SCROLL_STEP);
            return vec![];
        }
        KeyCode::PageDown => {
            app.transcript.scroll_down(SCROLL_STEP);
            return vec![];
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar_key(app, key),
        Focus::Input => handle_input_key(app, key),
    }
}

fn handle_sidebar_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.sidebar_cursor = app.sidebar_cursor.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.sidebar_cursor + 1 < app.sessions.len() {
                app.sidebar_cursor += 1;
            }
            vec![]
        }
        KeyCode::Enter => match app.highlighted_session() {
            Some(session) => {
                let id = session.id;
                handle_action(app, UserAction::SelectSession(id))
            }
            None => vec![],
        },
        KeyCode::Char('n') => handle_action(app, UserAction::CreateSession),
        KeyCode::Char('r') => {
            if let Some(session) = app.highlighted_session() {
                app.overlay = Some(Overlay::Rename(RenameState::open(
                    session.id,
                    &session.title,
                )));
            }
            vec![]
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(session) = app.highlighted_session() {
                app.overlay = Some(Overlay::ConfirmDelete(ConfirmDeleteState::open(
                    session.id,
                    &session.title,
                )));
            }
            vec![]
        }
        KeyCode::Esc => {
            app.focus = Focus::Input;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_input_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => {
            app.focus = Focus::Sidebar;
            vec![]
        }
        KeyCode::Enter => {
            if !input_enabled(app) {
                return vec![];
            }
            let text = app.input.buffer.text().to_string();
            handle_action(app, UserAction::SendMessage(text))
        }
        _ => {
            if input_enabled(app) {
                app.input.buffer.input(key);
            }
            vec![]
        }
    }
}

// ============================================================================
// Mutations
// ============================================================================

fn apply_mutations(app: &mut AppState, mutations: Vec<StateMutation>) {
    for mutation in mutations {
        match mutation {
            StateMutation::Sessions(mutation) => app.sessions.apply(mutation),
            StateMutation::Transcript(mutation) => app.transcript.apply(mutation),
            StateMutation::Document(mutation) => app.document.apply(mutation),
            StateMutation::Input(mutation) => app.input.apply(mutation),
            StateMutation::SetActive(active) => app.active = active,
            StateMutation::SetStatus(status) => app.status = status,
        }
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
