//! Terminal runtime - owns the terminal, runs the event loop, renders.
//!
//! Effects are executed by the `Controller`; results arrive through its
//! inbox and are drained once per loop iteration.

mod controller;
mod handlers;
mod inbox;

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
pub use controller::Controller;
use crossterm::event;
use docchat_core::backend::Backend;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::events::UiEvent;
use crate::{render, terminal};

/// Tick cadence while requests are in flight (spinner animation).
const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Poll duration when idle.
const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

pub struct TuiRuntime<B: Backend> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: Controller<B>,
    last_tick: Instant,
}

impl<B: Backend> TuiRuntime<B> {
    pub fn new(controller: Controller<B>) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        Ok(Self {
            terminal,
            controller,
            last_tick: Instant::now(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        self.controller.start();
        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.controller.state.should_quit {
            if self.controller.drain_inbox() > 0 {
                dirty = true;
            }

            let state = &self.controller.state;
            let busy = state.tasks.is_any_running()
                || !state.pending.chats.is_empty()
                || !state.pending.uploads.is_empty();
            let tick_interval = if busy {
                FRAME_DURATION
            } else {
                IDLE_POLL_DURATION
            };

            if dirty {
                self.terminal
                    .draw(|frame| render::render(&self.controller.state, frame))?;
                dirty = false;
            }

            let poll_duration = tick_interval.saturating_sub(self.last_tick.elapsed());
            if event::poll(poll_duration)? {
                self.controller.dispatch(UiEvent::Terminal(event::read()?));
                while event::poll(Duration::ZERO)? {
                    self.controller.dispatch(UiEvent::Terminal(event::read()?));
                }
                dirty = true;
            }

            if self.last_tick.elapsed() >= tick_interval {
                self.controller.dispatch(UiEvent::Tick);
                self.last_tick = Instant::now();
                dirty |= busy;
            }
        }

        Ok(())
    }
}

impl<B: Backend> Drop for TuiRuntime<B> {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
