use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug)]
pub struct TaskCompleted<T> {
    pub id: TaskId,
    pub result: T,
}

/// Lifecycle of the single in-flight task (mutated only by the controller).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, id: TaskId, cancel: CancellationToken) {
        self.active = Some(id);
        self.cancel = Some(cancel);
    }

    /// Clears the task if `id` is the active one. Returns false for stale ids.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Cancels the active task, if any, and forgets it.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_id_is_rejected() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();

        let first = seq.next_id();
        let second = seq.next_id();
        state.on_started(second, CancellationToken::new());

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_cancel_trips_token() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let token = CancellationToken::new();
        state.on_started(seq.next_id(), token.clone());

        state.cancel();
        assert!(token.is_cancelled());
        assert!(!state.is_running());
    }
}
