use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::wire::{
    Ack, AuthResponse, ChatRequest, ChatResponse, CreateSessionRequest, CreateSessionResponse,
    CredentialsRequest, ErrorBody, MessagesResponse, RenameRequest, SessionsResponse,
    UploadResponse,
};
use super::{Backend, BackendError, BackendResult};
use crate::config::Config;
use crate::models::{Message, Session, SessionId, UploadedDocument, User};

/// JSON-over-HTTP client for the chat server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> BackendResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> BackendResult<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> BackendResult<T> {
        debug!(path, "GET");
        let response = self.http.get(self.url(path)).query(query).send().await?;
        decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> BackendResult<T> {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> BackendResult<T> {
        debug!(path, "PUT");
        let response = self.http.put(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        debug!(path, "DELETE");
        let response = self.http.delete(self.url(path)).send().await?;
        decode(response).await
    }

    async fn authenticate(&self, path: &str, email: &str, password: &str) -> BackendResult<User> {
        let payload: AuthResponse = self
            .post(path, &CredentialsRequest { email, password })
            .await?;
        if !payload.success {
            return Err(BackendError::Rejected(
                payload
                    .error
                    .unwrap_or_else(|| "authentication failed".to_string()),
            ));
        }
        let id = payload
            .user_id
            .ok_or_else(|| BackendError::Rejected("response is missing user_id".to_string()))?;
        Ok(User {
            id,
            email: payload.email.unwrap_or_else(|| email.to_string()),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("server returned {status}"));
        return Err(BackendError::Rejected(message));
    }
    Ok(response.json().await?)
}

fn ack(payload: Ack, operation: &str) -> BackendResult<()> {
    if payload.success {
        Ok(())
    } else {
        Err(BackendError::Rejected(
            payload
                .error
                .unwrap_or_else(|| format!("{operation} was refused")),
        ))
    }
}

impl Backend for HttpBackend {
    async fn register(&self, email: &str, password: &str) -> BackendResult<User> {
        self.authenticate("/api/register", email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> BackendResult<User> {
        self.authenticate("/api/login", email, password).await
    }

    async fn list_sessions(&self, user_id: i64) -> BackendResult<Vec<Session>> {
        let payload: SessionsResponse = self
            .get("/api/sessions", &[("user_id", user_id.to_string())])
            .await?;
        Ok(payload
            .sessions
            .into_iter()
            .map(|row| Session::from_stored(SessionId(row.id), row.title, row.created_at))
            .collect())
    }

    async fn create_session(&self, user_id: i64, title: &str) -> BackendResult<Session> {
        let payload: CreateSessionResponse = self
            .post("/api/sessions", &CreateSessionRequest { user_id, title })
            .await?;
        Ok(Session::new(SessionId(payload.session_id), payload.title))
    }

    async fn fetch_messages(&self, session_id: SessionId) -> BackendResult<Vec<Message>> {
        let payload: MessagesResponse = self
            .get(&format!("/api/messages/{session_id}"), &[])
            .await?;
        Ok(payload
            .messages
            .into_iter()
            .map(|row| Message {
                sender: row.sender,
                text: row.text,
            })
            .collect())
    }

    async fn rename_session(&self, session_id: SessionId, title: &str) -> BackendResult<()> {
        let payload: Ack = self
            .put(&format!("/api/sessions/{session_id}"), &RenameRequest { title })
            .await?;
        ack(payload, "rename")
    }

    async fn delete_session(&self, session_id: SessionId) -> BackendResult<()> {
        let payload: Ack = self.delete(&format!("/api/sessions/{session_id}")).await?;
        ack(payload, "delete")
    }

    async fn derive_title(&self, session_id: SessionId) -> BackendResult<Option<String>> {
        let payload: Ack = self
            .post(
                &format!("/api/sessions/{session_id}/update-title"),
                &serde_json::json!({}),
            )
            .await?;
        Ok(payload
            .success
            .then_some(payload.title)
            .flatten()
            .filter(|t| !t.trim().is_empty()))
    }

    async fn send_chat(
        &self,
        user_id: i64,
        session_id: SessionId,
        message: &str,
        document: Option<&str>,
    ) -> BackendResult<String> {
        let request = ChatRequest {
            message,
            user_id,
            session_id: session_id.0,
            file_context: document,
        };
        let payload: ChatResponse = self.post("/api/chat", &request).await?;
        match (payload.response, payload.error) {
            (Some(reply), _) => Ok(reply),
            (None, Some(error)) => Err(BackendError::Rejected(error)),
            (None, None) => Err(BackendError::Rejected(
                "response is missing the reply".to_string(),
            )),
        }
    }

    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> BackendResult<UploadedDocument> {
        debug!(file_name, size = bytes.len(), "POST /api/upload");
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;
        let payload: UploadResponse = decode(response).await?;
        if let Some(error) = payload.error {
            return Err(BackendError::Rejected(error));
        }
        let analysis = payload
            .analysis
            .ok_or_else(|| BackendError::Rejected("response is missing the analysis".to_string()))?;
        Ok(UploadedDocument {
            content: payload.content.unwrap_or_default(),
            analysis,
        })
    }
}
