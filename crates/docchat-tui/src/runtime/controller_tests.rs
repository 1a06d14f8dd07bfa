use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use docchat_core::backend::{BackendError, BackendResult};
use docchat_core::models::{
    CHAT_FAILED_TEXT, Message, Session, SessionId, UPLOAD_FAILED_TEXT, UploadedDocument, User,
};
use tempfile::tempdir;

use super::*;
use crate::events::UserAction;

#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
    fail_chat: bool,
    /// Replies to this message are held back for a while.
    slow_message: Option<String>,
}

impl FakeBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

impl Backend for FakeBackend {
    async fn register(&self, email: &str, _password: &str) -> BackendResult<User> {
        Ok(User {
            id: 1,
            email: email.to_string(),
        })
    }

    async fn login(&self, email: &str, _password: &str) -> BackendResult<User> {
        Ok(User {
            id: 1,
            email: email.to_string(),
        })
    }

    async fn list_sessions(&self, user_id: i64) -> BackendResult<Vec<Session>> {
        self.record(format!("list_sessions {user_id}"));
        Ok(vec![
            Session::new(SessionId(2), "Second"),
            Session::new(SessionId(1), "First"),
        ])
    }

    async fn create_session(&self, _user_id: i64, title: &str) -> BackendResult<Session> {
        self.record("create_session".to_string());
        Ok(Session::new(SessionId(10), title))
    }

    async fn fetch_messages(&self, session_id: SessionId) -> BackendResult<Vec<Message>> {
        self.record(format!("fetch_messages {session_id}"));
        Ok(vec![Message::user(format!("stored in {session_id}"))])
    }

    async fn rename_session(&self, session_id: SessionId, title: &str) -> BackendResult<()> {
        self.record(format!("rename_session {session_id} {title}"));
        Ok(())
    }

    async fn delete_session(&self, session_id: SessionId) -> BackendResult<()> {
        self.record(format!("delete_session {session_id}"));
        Ok(())
    }

    async fn derive_title(&self, session_id: SessionId) -> BackendResult<Option<String>> {
        self.record(format!("derive_title {session_id}"));
        Ok(Some("Hello".to_string()))
    }

    async fn send_chat(
        &self,
        _user_id: i64,
        session_id: SessionId,
        message: &str,
        document: Option<&str>,
    ) -> BackendResult<String> {
        self.record(format!(
            "send_chat {session_id} {message} {}",
            document.unwrap_or("-")
        ));
        if self.slow_message.as_deref() == Some(message) {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        if self.fail_chat {
            return Err(BackendError::Rejected("model unavailable".to_string()));
        }
        Ok(format!("re: {message}"))
    }

    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> BackendResult<UploadedDocument> {
        self.record(format!("upload_file {file_name}"));
        Ok(UploadedDocument {
            content: String::from_utf8_lossy(&bytes).into_owned(),
            analysis: "A short note.".to_string(),
        })
    }
}

fn controller(backend: FakeBackend, dir: &Path) -> Controller<FakeBackend> {
    let user = User {
        id: 1,
        email: "ada@example.com".to_string(),
    };
    Controller::new(
        backend,
        AppState::new(user, Theme::Dark),
        UserStore::new(dir.join("user.json")),
        dir.join("config.toml"),
    )
}

async fn next(controller: &mut Controller<FakeBackend>) {
    let processed = tokio::time::timeout(Duration::from_secs(5), controller.process_next())
        .await
        .expect("timed out waiting for inbox event");
    assert!(processed);
}

fn act(controller: &mut Controller<FakeBackend>, action: UserAction) {
    controller.dispatch(UiEvent::Action(action));
}

async fn new_session(controller: &mut Controller<FakeBackend>) {
    act(controller, UserAction::CreateSession);
    next(controller).await;
    assert_eq!(controller.state.active, Some(SessionId(10)));
}

#[tokio::test]
async fn test_start_loads_sessions() {
    let dir = tempdir().unwrap();
    let mut c = controller(FakeBackend::default(), dir.path());

    c.start();
    next(&mut c).await;

    let ids: Vec<_> = c.state.sessions.list().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![SessionId(2), SessionId(1)]);
    assert_eq!(c.backend().calls(), vec!["list_sessions 1"]);
    assert!(c.state.status.is_none());
}

#[tokio::test]
async fn test_switching_away_and_back_refetches() {
    let dir = tempdir().unwrap();
    let mut c = controller(FakeBackend::default(), dir.path());
    c.start();
    next(&mut c).await;

    act(&mut c, UserAction::SelectSession(SessionId(1)));
    act(&mut c, UserAction::SelectSession(SessionId(2)));
    act(&mut c, UserAction::SelectSession(SessionId(1)));
    for _ in 0..3 {
        next(&mut c).await;
    }

    assert_eq!(c.backend().count("fetch_messages 1"), 2);
    assert_eq!(c.backend().count("fetch_messages 2"), 1);
    assert_eq!(c.state.active, Some(SessionId(1)));
    assert_eq!(c.state.transcript.messages(), &[Message::user("stored in 1")]);
    assert!(!c.state.transcript.is_loading());
}

#[tokio::test]
async fn test_send_reply_and_auto_title() {
    let dir = tempdir().unwrap();
    let mut c = controller(FakeBackend::default(), dir.path());
    new_session(&mut c).await;

    act(&mut c, UserAction::SendMessage("Hello".to_string()));
    assert!(c.state.is_awaiting_reply());
    next(&mut c).await;

    assert_eq!(
        c.state.transcript.messages(),
        &[Message::user("Hello"), Message::bot("re: Hello")]
    );
    assert!(!c.state.is_awaiting_reply());

    next(&mut c).await;
    assert_eq!(c.backend().count("derive_title 10"), 1);
    assert_eq!(c.state.sessions.get(SessionId(10)).unwrap().title, "Hello");
    assert!(c.backend().calls().contains(&"send_chat 10 Hello -".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_late_reply_is_appended_after_faster_one() {
    let dir = tempdir().unwrap();
    let backend = FakeBackend {
        slow_message: Some("first".to_string()),
        ..FakeBackend::default()
    };
    let mut c = controller(backend, dir.path());
    new_session(&mut c).await;

    act(&mut c, UserAction::SendMessage("first".to_string()));
    act(&mut c, UserAction::SendMessage("second".to_string()));
    next(&mut c).await;
    assert!(c.state.is_awaiting_reply());
    while c.state.is_awaiting_reply() {
        next(&mut c).await;
    }

    assert_eq!(
        c.state.transcript.messages(),
        &[
            Message::user("first"),
            Message::user("second"),
            Message::bot("re: second"),
            Message::bot("re: first"),
        ]
    );
    assert!(!c.state.is_awaiting_reply());
}

#[tokio::test]
async fn test_chat_failure_shows_diagnostic() {
    let dir = tempdir().unwrap();
    let backend = FakeBackend {
        fail_chat: true,
        ..FakeBackend::default()
    };
    let mut c = controller(backend, dir.path());
    new_session(&mut c).await;

    act(&mut c, UserAction::SendMessage("Hello".to_string()));
    next(&mut c).await;

    assert_eq!(
        c.state.transcript.messages().last(),
        Some(&Message::bot(CHAT_FAILED_TEXT))
    );
    assert!(!c.state.is_awaiting_reply());
    assert_eq!(c.backend().count("derive_title 10"), 0);
}

#[tokio::test]
async fn test_upload_sets_document_and_attaches_it() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "alpha beta").unwrap();
    let mut c = controller(FakeBackend::default(), dir.path());
    new_session(&mut c).await;

    act(&mut c, UserAction::UploadFile(Some(file)));
    next(&mut c).await;

    assert_eq!(c.state.document.display_name(), "notes.txt");
    assert_eq!(c.state.document.attachment(), Some("alpha beta"));
    assert_eq!(
        c.state.sessions.get(SessionId(10)).unwrap().title,
        "📄 notes.txt"
    );

    // Persisting the file title.
    next(&mut c).await;
    assert_eq!(c.backend().count("rename_session 10 📄 notes.txt"), 1);

    act(&mut c, UserAction::SendMessage("Summarize".to_string()));
    next(&mut c).await;
    assert_eq!(c.backend().count("send_chat 10 Summarize alpha beta"), 1);
}

#[tokio::test]
async fn test_unreadable_upload_reports_failure() {
    let dir = tempdir().unwrap();
    let mut c = controller(FakeBackend::default(), dir.path());
    new_session(&mut c).await;

    act(
        &mut c,
        UserAction::UploadFile(Some(dir.path().join("missing.pdf"))),
    );
    next(&mut c).await;

    assert_eq!(
        c.state.transcript.messages().last(),
        Some(&Message::bot(UPLOAD_FAILED_TEXT))
    );
    assert!(!c.state.document.is_active());
    assert!(c.backend().calls().iter().all(|call| !call.starts_with("upload_file")));
}

#[tokio::test]
async fn test_logout_clears_stored_user() {
    let dir = tempdir().unwrap();
    let store = UserStore::new(dir.path().join("user.json"));
    store
        .save(&User {
            id: 1,
            email: "ada@example.com".to_string(),
        })
        .unwrap();
    let mut c = controller(FakeBackend::default(), dir.path());

    act(&mut c, UserAction::Logout);

    assert!(c.state.should_quit);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_theme_toggle_is_persisted() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let mut c = controller(FakeBackend::default(), dir.path());

    act(&mut c, UserAction::ToggleTheme);

    let mut saved = None;
    for _ in 0..50 {
        if config_path.exists()
            && let Ok(config) = Config::load_from(&config_path)
        {
            saved = Some(config.theme);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(saved, Some(Theme::Light));
}
