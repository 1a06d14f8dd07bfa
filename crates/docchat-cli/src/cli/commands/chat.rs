//! Chat command handler.

use anyhow::{Context, Result};
use docchat_core::config::Config;
use tracing::info;

pub fn run(config: &Config) -> Result<()> {
    let user = super::require_user()?;
    let backend = super::client(config)?;
    info!(user = user.id, server = backend.base_url(), "starting chat");

    docchat_tui::run_chat(config, user, backend).context("interactive chat failed")
}
