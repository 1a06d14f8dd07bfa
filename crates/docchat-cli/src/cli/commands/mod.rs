//! CLI command handlers.

use anyhow::{Context, Result};
use docchat_core::auth::UserStore;
use docchat_core::backend::HttpBackend;
use docchat_core::config::Config;
use docchat_core::models::User;

pub mod auth;
pub mod chat;
pub mod config;
pub mod sessions;

/// The stored login, or an error telling the user how to log in.
fn require_user() -> Result<User> {
    UserStore::default()
        .load()?
        .context("Not logged in. Run `docchat login --email <EMAIL> --password <PASSWORD>` first.")
}

fn client(config: &Config) -> Result<HttpBackend> {
    HttpBackend::from_config(config).context("create HTTP client")
}
