//! Local storage of the logged-in user.
//!
//! The identity is written by `docchat login`/`register` and read once at
//! startup by the chat UI. The UI never changes it; logout deletes the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::models::User;

#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    user_id: i64,
    email: String,
    /// RFC 3339 timestamp of the login.
    #[serde(default)]
    logged_in_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(paths::user_path())
    }
}

impl UserStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored user, or `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<User>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let stored: StoredUser = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(User {
            id: stored.user_id,
            email: stored.email,
        }))
    }

    pub fn save(&self, user: &User) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let stored = StoredUser {
            user_id: user.id,
            email: user.email.clone(),
            logged_in_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        let json = serde_json::to_string_pretty(&stored).context("Failed to serialize user")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Removes the stored user. Returns whether anyone was logged in.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}
