//! Session sidebar state.
//!
//! Holds session summaries only, newest first. Ids are unique.

use std::collections::HashSet;

use docchat_core::models::{Session, SessionId};
use tracing::debug;

use crate::mutations::SessionMutation;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
    /// Sessions with a manual rename awaiting the server.
    renaming: HashSet<SessionId>,
    /// Sessions with a derived-title request in flight.
    deriving: HashSet<SessionId>,
    /// Local changes made while a list fetch is outstanding.
    sync: Option<LocalChanges>,
}

/// Sessions created, retitled or removed since the list fetch started.
#[derive(Debug, Default)]
struct LocalChanges {
    touched: HashSet<SessionId>,
    removed: HashSet<SessionId>,
}

impl SessionStore {
    pub fn list(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    pub fn is_renaming(&self, id: SessionId) -> bool {
        self.renaming.contains(&id)
    }

    /// Whether an automatic title may still be applied to `id`.
    pub fn needs_auto_title(&self, id: SessionId) -> bool {
        !self.renaming.contains(&id) && self.get(id).is_some_and(|s| s.title_is_placeholder)
    }

    /// Whether a derived-title request should be issued for `id`.
    pub fn should_derive_title(&self, id: SessionId) -> bool {
        self.needs_auto_title(id) && !self.deriving.contains(&id)
    }

    pub fn apply(&mut self, mutation: SessionMutation) {
        match mutation {
            SessionMutation::BeginSync => self.sync = Some(LocalChanges::default()),
            SessionMutation::EndSync => self.sync = None,
            SessionMutation::ReplaceAll(sessions) => self.replace_all(sessions),
            SessionMutation::Prepend(session) => {
                self.touch(session.id);
                self.prepend(session);
            }
            SessionMutation::Rename { id, title } => {
                self.renaming.remove(&id);
                if self.set_title(id, title) {
                    self.touch(id);
                } else {
                    debug!(session = %id, "rename for unknown session ignored");
                }
            }
            SessionMutation::AutoTitle { id, title } => {
                if self.needs_auto_title(id) && self.set_title(id, title) {
                    self.touch(id);
                }
            }
            SessionMutation::Remove(id) => {
                self.sessions.retain(|s| s.id != id);
                self.renaming.remove(&id);
                self.deriving.remove(&id);
                if let Some(sync) = self.sync.as_mut() {
                    sync.touched.remove(&id);
                    sync.removed.insert(id);
                }
            }
            SessionMutation::BeginRename(id) => {
                self.renaming.insert(id);
            }
            SessionMutation::EndRename(id) => {
                self.renaming.remove(&id);
            }
            SessionMutation::BeginDerive(id) => {
                self.deriving.insert(id);
            }
            SessionMutation::EndDerive(id) => {
                self.deriving.remove(&id);
            }
        }
    }

    fn touch(&mut self, id: SessionId) {
        if let Some(sync) = self.sync.as_mut() {
            sync.touched.insert(id);
        }
    }

    /// Installs a fetched list. Local changes made since `BeginSync` win over
    /// the fetched rows, and locally created sessions stay in front.
    fn replace_all(&mut self, sessions: Vec<Session>) {
        let changes = self.sync.take().unwrap_or_default();
        let mut seen = HashSet::new();
        let local: Vec<Session> = self
            .sessions
            .drain(..)
            .filter(|s| changes.touched.contains(&s.id))
            .collect();
        let mut merged = Vec::with_capacity(local.len() + sessions.len());
        for session in local.into_iter().chain(sessions) {
            if !changes.removed.contains(&session.id) && seen.insert(session.id) {
                merged.push(session);
            }
        }
        self.sessions = merged;
        self.renaming.retain(|id| seen.contains(id));
        self.deriving.retain(|id| seen.contains(id));
    }

    fn prepend(&mut self, session: Session) {
        self.sessions.retain(|s| s.id != session.id);
        self.sessions.insert(0, session);
    }

    fn set_title(&mut self, id: SessionId, title: String) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.title = title;
                session.title_is_placeholder = false;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use docchat_core::models::PLACEHOLDER_TITLE;

    use super::*;

    fn placeholder(id: i64) -> Session {
        Session::new(SessionId(id), PLACEHOLDER_TITLE)
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        store.apply(SessionMutation::Prepend(placeholder(2)));

        let ids: Vec<_> = store.list().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_ids_stay_unique() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        store.apply(SessionMutation::Prepend(placeholder(2)));
        store.apply(SessionMutation::Prepend(placeholder(1)));
        assert_eq!(store.len(), 2);

        store.apply(SessionMutation::ReplaceAll(vec![
            placeholder(5),
            Session::new(SessionId(5), "dup"),
            placeholder(4),
        ]));
        assert_eq!(store.len(), 2);
        assert!(store.get(SessionId(5)).unwrap().title_is_placeholder);
    }

    #[test]
    fn test_auto_title_applies_once() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));

        store.apply(SessionMutation::AutoTitle {
            id: SessionId(1),
            title: "📄 notes.txt".to_string(),
        });
        store.apply(SessionMutation::AutoTitle {
            id: SessionId(1),
            title: "Hello".to_string(),
        });

        let session = store.get(SessionId(1)).unwrap();
        assert_eq!(session.title, "📄 notes.txt");
        assert!(!session.title_is_placeholder);
    }

    #[test]
    fn test_manual_rename_blocks_auto_title_while_in_flight() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        store.apply(SessionMutation::BeginRename(SessionId(1)));

        assert!(!store.needs_auto_title(SessionId(1)));
        store.apply(SessionMutation::AutoTitle {
            id: SessionId(1),
            title: "Hello".to_string(),
        });
        assert_eq!(store.get(SessionId(1)).unwrap().title, PLACEHOLDER_TITLE);

        store.apply(SessionMutation::Rename {
            id: SessionId(1),
            title: "Mine".to_string(),
        });
        assert_eq!(store.get(SessionId(1)).unwrap().title, "Mine");
        assert!(!store.is_renaming(SessionId(1)));
        assert!(!store.needs_auto_title(SessionId(1)));
    }

    #[test]
    fn test_failed_manual_rename_reopens_auto_title() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        store.apply(SessionMutation::BeginRename(SessionId(1)));
        store.apply(SessionMutation::EndRename(SessionId(1)));
        assert!(store.needs_auto_title(SessionId(1)));
    }

    #[test]
    fn test_rename_unknown_session_is_noop() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        store.apply(SessionMutation::Rename {
            id: SessionId(9),
            title: "x".to_string(),
        });
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(SessionId(1)).unwrap().title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_derive_requested_once() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        assert!(store.should_derive_title(SessionId(1)));
        store.apply(SessionMutation::BeginDerive(SessionId(1)));
        assert!(!store.should_derive_title(SessionId(1)));
        assert!(store.needs_auto_title(SessionId(1)));
    }

    #[test]
    fn test_fetched_list_keeps_local_changes() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::ReplaceAll(vec![
            Session::new(SessionId(1), "Old"),
            Session::new(SessionId(2), "Two"),
            Session::new(SessionId(3), "Three"),
        ]));

        store.apply(SessionMutation::BeginSync);
        store.apply(SessionMutation::Prepend(placeholder(42)));
        store.apply(SessionMutation::Rename {
            id: SessionId(1),
            title: "Mine".to_string(),
        });
        store.apply(SessionMutation::Remove(SessionId(3)));
        store.apply(SessionMutation::ReplaceAll(vec![
            Session::new(SessionId(3), "Three"),
            Session::new(SessionId(2), "Two"),
            Session::new(SessionId(1), "Old"),
        ]));

        let ids: Vec<_> = store.list().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![42, 1, 2]);
        assert_eq!(store.get(SessionId(1)).unwrap().title, "Mine");
        assert!(store.needs_auto_title(SessionId(42)));
    }

    #[test]
    fn test_changes_outside_a_fetch_are_not_kept() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(42)));
        store.apply(SessionMutation::BeginSync);
        store.apply(SessionMutation::EndSync);
        store.apply(SessionMutation::Prepend(placeholder(43)));

        store.apply(SessionMutation::ReplaceAll(vec![Session::new(
            SessionId(1),
            "Old",
        )]));
        let ids: Vec<_> = store.list().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_remove() {
        let mut store = SessionStore::default();
        store.apply(SessionMutation::Prepend(placeholder(1)));
        store.apply(SessionMutation::Prepend(placeholder(2)));
        store.apply(SessionMutation::Remove(SessionId(1)));
        assert!(!store.contains(SessionId(1)));
        assert_eq!(store.index_of(SessionId(2)), Some(0));
    }
}
