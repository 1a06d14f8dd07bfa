//! Chat backend interface.
//!
//! `Backend` is the seam between the conversation controller and the remote
//! service. `HttpBackend` talks to the real server; tests substitute an
//! in-memory implementation.

use std::future::Future;
use std::path::PathBuf;

mod http;
mod wire;

pub use http::HttpBackend;

use crate::models::{Message, Session, SessionId, UploadedDocument, User};

/// Failure of a backend operation.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a usable response (connect, timeout, decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered and refused the operation.
    #[error("{0}")]
    Rejected(String),
    /// A local file could not be read before upload.
    #[error("failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Operations the client needs from the server.
///
/// Implementations must be shareable across spawned tasks.
pub trait Backend: Send + Sync + 'static {
    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = BackendResult<User>> + Send;

    fn login(&self, email: &str, password: &str)
    -> impl Future<Output = BackendResult<User>> + Send;

    /// Sessions for `user_id`, newest first.
    fn list_sessions(&self, user_id: i64)
    -> impl Future<Output = BackendResult<Vec<Session>>> + Send;

    fn create_session(
        &self,
        user_id: i64,
        title: &str,
    ) -> impl Future<Output = BackendResult<Session>> + Send;

    fn fetch_messages(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = BackendResult<Vec<Message>>> + Send;

    fn rename_session(
        &self,
        session_id: SessionId,
        title: &str,
    ) -> impl Future<Output = BackendResult<()>> + Send;

    fn delete_session(&self, session_id: SessionId)
    -> impl Future<Output = BackendResult<()>> + Send;

    /// Asks the server to derive a title from the session's first message.
    ///
    /// `Ok(None)` means the server had nothing to derive from.
    fn derive_title(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = BackendResult<Option<String>>> + Send;

    /// One chat turn. `document` is attached verbatim when present.
    fn send_chat(
        &self,
        user_id: i64,
        session_id: SessionId,
        message: &str,
        document: Option<&str>,
    ) -> impl Future<Output = BackendResult<String>> + Send;

    /// Uploads a file for analysis.
    fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = BackendResult<UploadedDocument>> + Send;
}
