//! Session command handlers.

use anyhow::{Context, Result};
use docchat_core::backend::Backend;
use docchat_core::config::Config;
use docchat_core::models::{Sender, SessionId};
use docchat_core::title::normalize_title;

pub async fn list(config: &Config) -> Result<()> {
    let user = super::require_user()?;
    let sessions = super::client(config)?
        .list_sessions(user.id)
        .await
        .context("list sessions")?;
    if sessions.is_empty() {
        println!("No sessions found.");
    } else {
        for session in sessions {
            let created = session.created_at.as_deref().unwrap_or("unknown");
            println!("{}  {}  {}", session.title, session.id, created);
        }
    }
    Ok(())
}

pub async fn show(config: &Config, id: i64) -> Result<()> {
    let messages = super::client(config)?
        .fetch_messages(SessionId(id))
        .await
        .with_context(|| format!("load session {id}"))?;
    if messages.is_empty() {
        println!("Session {id} has no messages.");
        return Ok(());
    }
    for message in messages {
        let label = match message.sender {
            Sender::User => "You",
            Sender::Bot => "AI",
        };
        println!("{label}: {}", message.text);
    }
    Ok(())
}

pub async fn rename(config: &Config, id: i64, title: &str) -> Result<()> {
    let title = normalize_title(title).context("Title cannot be empty")?;
    super::client(config)?
        .rename_session(SessionId(id), &title)
        .await
        .with_context(|| format!("rename session {id}"))?;
    println!("Renamed session {id} → {title}");
    Ok(())
}

pub async fn delete(config: &Config, id: i64) -> Result<()> {
    super::client(config)?
        .delete_session(SessionId(id))
        .await
        .with_context(|| format!("delete session {id}"))?;
    println!("Deleted session {id}");
    Ok(())
}
