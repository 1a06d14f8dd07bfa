//! Conversation controller: owns the state and executes effects.
//!
//! This is the side-effect boundary. The reducer stays pure; the controller
//! spawns backend calls and feeds their results back through the inbox. It
//! has no terminal, so it drives tests as well as the UI.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use docchat_core::auth::UserStore;
use docchat_core::backend::Backend;
use docchat_core::config::{Config, Theme};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::handlers;
use super::inbox::{UiEventReceiver, UiEventSender};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::update;

pub struct Controller<B: Backend> {
    backend: Arc<B>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    user_store: UserStore,
    config_path: PathBuf,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, state: AppState, user_store: UserStore, config_path: PathBuf) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            backend: Arc::new(backend),
            state,
            inbox_tx,
            inbox_rx,
            user_store,
            config_path,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the startup effects (initial session list).
    pub fn start(&mut self) {
        let effects = update::init(&mut self.state);
        self.execute_effects(effects);
    }

    /// Runs one event through the reducer and executes its effects.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    /// Dispatches every event already in the inbox. Returns how many ran.
    pub fn drain_inbox(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    /// Waits for the next inbox event and dispatches it.
    pub async fn process_next(&mut self) -> bool {
        match self.inbox_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and posts its result to the inbox.
    fn spawn_effect<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let backend = Arc::clone(&self.backend);
        let user_id = self.state.user.id;
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Logout => {
                match self.user_store.clear() {
                    Ok(_) => info!("logged out"),
                    Err(e) => warn!("failed to clear stored user: {e:#}"),
                }
                self.state.should_quit = true;
            }
            UiEffect::PersistTheme(theme) => self.persist_theme(theme),
            UiEffect::LoadSessions { task } => {
                self.spawn_effect(handlers::load_sessions(backend, user_id, task));
            }
            UiEffect::CreateSession => {
                self.spawn_effect(handlers::create_session(backend, user_id));
            }
            UiEffect::LoadMessages { task, session_id } => {
                self.spawn_effect(handlers::load_messages(backend, task, session_id));
            }
            UiEffect::RenameSession {
                session_id,
                title,
                manual,
            } => {
                self.spawn_effect(handlers::rename_session(backend, session_id, title, manual));
            }
            UiEffect::DeleteSession { session_id } => {
                self.spawn_effect(handlers::delete_session(backend, session_id));
            }
            UiEffect::DeriveTitle { session_id } => {
                self.spawn_effect(handlers::derive_title(backend, session_id));
            }
            UiEffect::SendChat {
                task,
                session_id,
                text,
                document,
            } => {
                self.spawn_effect(handlers::send_chat(
                    backend, user_id, task, session_id, text, document,
                ));
            }
            UiEffect::UploadFile {
                task,
                session_id,
                path,
            } => {
                self.spawn_effect(handlers::upload_file(backend, task, session_id, path));
            }
        }
    }

    fn persist_theme(&self, theme: Theme) {
        let path = self.config_path.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Config::save_theme_to(&path, theme) {
                warn!("failed to save theme: {e:#}");
            }
        });
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
