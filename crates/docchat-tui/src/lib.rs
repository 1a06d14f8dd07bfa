//! Terminal chat front-end for docchat.
//!
//! Elm-style: `update` is the only place state changes, `render` only reads
//! it, and the runtime executes effects against the backend.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use docchat_core::auth::UserStore;
use docchat_core::backend::Backend;
use docchat_core::config::{Config, paths};
use docchat_core::models::User;
pub use runtime::{Controller, TuiRuntime};

use crate::state::AppState;

/// Runs the interactive chat UI until the user quits or logs out.
///
/// Must be called from within a tokio runtime; backend calls are spawned on it.
pub fn run_chat<B: Backend>(config: &Config, user: User, backend: B) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!("Chat mode requires a terminal.");
    }

    let state = AppState::new(user, config.theme);
    let controller = Controller::new(
        backend,
        state,
        UserStore::default(),
        paths::config_path(),
    );
    let mut runtime = TuiRuntime::new(controller)?;
    runtime.run()
}
