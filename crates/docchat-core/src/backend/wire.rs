//! JSON bodies exchanged with the server.

use serde::{Deserialize, Serialize};

use crate::models::Sender;

#[derive(Debug, Serialize)]
pub(super) struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionRow>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionRow {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateSessionRequest<'a> {
    pub user_id: i64,
    pub title: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateSessionResponse {
    pub session_id: i64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<MessageRow>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageRow {
    pub text: String,
    pub sender: Sender,
}

#[derive(Debug, Serialize)]
pub(super) struct RenameRequest<'a> {
    pub title: &'a str,
}

/// `{success, title?, error?}` acknowledgement.
#[derive(Debug, Deserialize)]
pub(super) struct Ack {
    #[serde(default)]
    pub success: bool,
    pub title: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub message: &'a str,
    pub user_id: i64,
    pub session_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_context: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    pub response: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UploadResponse {
    pub content: Option<String>,
    pub analysis: Option<String>,
    pub error: Option<String>,
}

/// Error body some endpoints return alongside a non-2xx status.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub error: Option<String>,
}
