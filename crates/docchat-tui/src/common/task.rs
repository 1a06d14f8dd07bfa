/// Tags a background request so its result can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Hands out unique task ids for the lifetime of the app.
#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    /// Returns a fresh id, never repeating within a run.
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    /// Finishes the task if `id` is still the latest one. Returns false for
    /// superseded results, which the caller must discard.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Latest-only background loads. Starting a new one supersedes the previous.
#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub session_list: TaskState,
    pub message_load: TaskState,
}

impl Tasks {
    pub fn is_any_running(&self) -> bool {
        self.session_list.is_running() || self.message_load.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_task_is_not_finished() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let first = seq.next_id();
        let second = seq.next_id();

        state.start(first);
        state.start(second);

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }
}
