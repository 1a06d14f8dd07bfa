//! Message log of the active session.

use docchat_core::models::{Message, SessionId};
use tracing::debug;

use crate::mutations::TranscriptMutation;

#[derive(Debug, Default)]
pub struct MessageLog {
    /// Session whose history this log holds.
    session: Option<SessionId>,
    messages: Vec<Message>,
    /// History fetch for `session` has not completed yet.
    loading: bool,
    /// Bumped on every reset.
    generation: u64,
    /// Lines scrolled up from the bottom.
    pub scroll_back: usize,
}

impl MessageLog {
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn belongs_to(&self, id: SessionId) -> bool {
        self.session == Some(id)
    }

    /// Identifies the current contents; results issued against an older
    /// generation must not be appended.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn apply(&mut self, mutation: TranscriptMutation) {
        match mutation {
            TranscriptMutation::Reset(session) => {
                self.session = session;
                self.messages.clear();
                self.loading = session.is_some();
                self.scroll_back = 0;
                self.generation = self.generation.wrapping_add(1);
            }
            TranscriptMutation::Load { session, messages } => {
                if self.session == Some(session) {
                    self.messages = messages;
                    self.loading = false;
                    self.scroll_back = 0;
                } else {
                    debug!(%session, "history for another session ignored");
                }
            }
            TranscriptMutation::Append(message) => {
                self.messages.push(message);
                self.scroll_back = 0;
            }
            TranscriptMutation::LoadFinished => self.loading = false,
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_tags_and_marks_loading() {
        let mut log = MessageLog::default();
        log.apply(TranscriptMutation::Append(Message::user("old")));
        log.apply(TranscriptMutation::Reset(Some(SessionId(3))));

        assert!(log.messages().is_empty());
        assert!(log.belongs_to(SessionId(3)));
        assert!(log.is_loading());
    }

    #[test]
    fn test_reset_bumps_generation_even_for_same_session() {
        let mut log = MessageLog::default();
        log.apply(TranscriptMutation::Reset(Some(SessionId(3))));
        let first = log.generation();
        log.apply(TranscriptMutation::Append(Message::user("Hello")));
        assert_eq!(log.generation(), first);

        log.apply(TranscriptMutation::Reset(Some(SessionId(3))));
        assert_ne!(log.generation(), first);
    }

    #[test]
    fn test_load_for_other_session_is_ignored() {
        let mut log = MessageLog::default();
        log.apply(TranscriptMutation::Reset(Some(SessionId(3))));
        log.apply(TranscriptMutation::Load {
            session: SessionId(4),
            messages: vec![Message::user("wrong")],
        });

        assert!(log.messages().is_empty());
        assert!(log.is_loading());
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut log = MessageLog::default();
        log.apply(TranscriptMutation::Reset(Some(SessionId(3))));
        log.apply(TranscriptMutation::Append(Message::user("optimistic")));
        log.apply(TranscriptMutation::Load {
            session: SessionId(3),
            messages: vec![Message::user("Hello"), Message::bot("Hi there")],
        });

        assert_eq!(
            log.messages(),
            &[Message::user("Hello"), Message::bot("Hi there")]
        );
        assert!(!log.is_loading());
    }
}
