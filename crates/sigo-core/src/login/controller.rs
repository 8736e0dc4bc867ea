//! Login runtime.
//!
//! `LoginController` owns the form state exclusively. It runs every event
//! through the reducer, publishes the new state to subscribers and executes
//! the returned effects. The authentication call is spawned onto tokio and
//! its result comes back through a oneshot channel tagged with a task id, so
//! a result for a task that is no longer active is dropped.
//!
//! Dropping the controller cancels any in-flight call; its result is never
//! applied.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;

use super::effects::LoginEffect;
use super::state::{LoginPhase, LoginState};
use super::task::{TaskCompleted, TaskId, TaskSeq, TaskState};
use super::update::{LoginEvent, update};
use crate::auth::{AuthFailure, AuthResult, Authenticator};
use crate::session::Session;

struct PendingLogin {
    id: TaskId,
    rx: oneshot::Receiver<AuthResult<Session>>,
}

pub struct LoginController<A: Authenticator> {
    auth: Arc<A>,
    state: LoginState,
    publisher: watch::Sender<LoginState>,
    task_seq: TaskSeq,
    task: TaskState,
    pending: Option<PendingLogin>,
}

impl<A: Authenticator> LoginController<A> {
    /// Creates a form with empty fields bound to `auth`.
    pub fn new(auth: Arc<A>) -> Self {
        let state = LoginState::default();
        let (publisher, _) = watch::channel(state.clone());
        Self {
            auth,
            state,
            publisher,
            task_seq: TaskSeq::default(),
            task: TaskState::default(),
            pending: None,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn phase(&self) -> LoginPhase {
        self.state.phase()
    }

    /// Returns a read-only observer of the form state.
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.publisher.subscribe()
    }

    pub fn set_username(&mut self, text: &str) {
        self.dispatch(LoginEvent::UsernameChanged(text.to_string()));
    }

    pub fn set_password(&mut self, text: &str) {
        self.dispatch(LoginEvent::PasswordChanged(text.to_string()));
    }

    /// Starts an authentication call with the current fields.
    ///
    /// Returns false (and does nothing) when a call is already in flight.
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> bool {
        if self.task.is_running() {
            tracing::debug!("login already in flight; submit ignored");
            return false;
        }
        self.dispatch(LoginEvent::SubmitRequested);
        self.task.is_running()
    }

    /// Waits for the in-flight call, if any, and applies its result.
    pub async fn settle(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let result = pending.rx.await.unwrap_or_else(|_| {
            Err(AuthFailure::unknown("login task ended without a result"))
        });
        self.complete(TaskCompleted {
            id: pending.id,
            result,
        });
    }

    /// Applies the in-flight result if it has already arrived.
    ///
    /// Returns true when a result was applied.
    pub fn poll(&mut self) -> bool {
        let Some(mut pending) = self.pending.take() else {
            return false;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => {
                self.pending = Some(pending);
                return false;
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(AuthFailure::unknown("login task ended without a result"))
            }
        };
        self.complete(TaskCompleted {
            id: pending.id,
            result,
        });
        true
    }

    /// Submits and waits for the outcome.
    pub async fn login(&mut self) -> &LoginState {
        self.submit();
        self.settle().await;
        &self.state
    }

    /// Hands the session to the caller and discards the form, credentials
    /// included. Returns None unless the form is in `Succeeded`.
    pub fn into_session(mut self) -> Option<Session> {
        if self.state.login_success {
            self.state.user.take()
        } else {
            None
        }
    }

    /// Tears the form down, cancelling any in-flight call.
    pub fn dispose(self) {
        drop(self);
    }

    fn complete(&mut self, completed: TaskCompleted<AuthResult<Session>>) {
        if !self.task.finish_if_active(completed.id) {
            tracing::debug!(task = completed.id.0, "discarding stale login result");
            return;
        }
        match &completed.result {
            Ok(session) => {
                tracing::info!(task = completed.id.0, username = %session.username, "login succeeded");
            }
            Err(failure) => {
                tracing::warn!(
                    task = completed.id.0,
                    kind = %failure.kind,
                    message = %failure.message,
                    details = failure.details.as_deref().unwrap_or(""),
                    "login failed"
                );
            }
        }
        self.dispatch(LoginEvent::LoginFinished(completed.result));
    }

    fn dispatch(&mut self, event: LoginEvent) {
        let effects = update(&mut self.state, event);
        self.publisher.send_replace(self.state.clone());
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: LoginEffect) {
        match effect {
            LoginEffect::SpawnLogin { username, password } => {
                let id = self.task_seq.next_id();
                let cancel = CancellationToken::new();
                self.task.on_started(id, cancel.clone());

                let (tx, rx) = oneshot::channel();
                self.pending = Some(PendingLogin { id, rx });

                let auth = Arc::clone(&self.auth);
                tracing::debug!(task = id.0, %username, "spawning login");
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {
                            tracing::debug!(task = id.0, "login cancelled");
                        }
                        result = auth.login(&username, &password) => {
                            // Receiver is gone when the form was torn down.
                            let _ = tx.send(result);
                        }
                    }
                });
            }
            LoginEffect::CancelLogin => {
                self.task.cancel();
                self.pending = None;
            }
        }
    }
}

impl<A: Authenticator> Drop for LoginController<A> {
    fn drop(&mut self) {
        let effects = update(&mut self.state, LoginEvent::Disposed);
        for effect in effects {
            self.execute(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::auth::AuthFailureKind;

    fn stub_session() -> Session {
        Session {
            person_id: 4021,
            person_full_name: "Ana María López".to_string(),
            username: "A001".to_string(),
            email: "a001@utm.example".to_string(),
            profile_name: "Alumno".to_string(),
            roles: vec!["STUDENT".to_string()],
            active: true,
        }
    }

    /// Accepts ("A001", "secret") and rejects everything else.
    #[derive(Default)]
    struct StubAuth {
        calls: AtomicUsize,
    }

    impl Authenticator for StubAuth {
        async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if username == "A001" && password == "secret" {
                Ok(stub_session())
            } else {
                Err(AuthFailure::invalid_credentials())
            }
        }

        async fn logout(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    /// Blocks every login until the gate is opened.
    #[derive(Default)]
    struct GatedAuth {
        gate: Notify,
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl Authenticator for GatedAuth {
        async fn login(&self, _username: &str, _password: &str) -> AuthResult<Session> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(stub_session())
        }

        async fn logout(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    /// Always fails with the given kind.
    struct FailingAuth(AuthFailureKind);

    impl Authenticator for FailingAuth {
        async fn login(&self, _username: &str, _password: &str) -> AuthResult<Session> {
            Err(AuthFailure::new(self.0, "stub failure"))
        }

        async fn logout(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    async fn yield_a_few() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_valid_credentials_reach_succeeded() {
        let auth = Arc::new(StubAuth::default());
        let mut form = LoginController::new(Arc::clone(&auth));

        form.set_username("a001");
        form.set_password("secret");
        let state = form.login().await;

        assert_eq!(state.phase(), LoginPhase::Succeeded);
        assert!(state.login_success);
        assert_eq!(state.user, Some(stub_session()));
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_credentials_reach_failed() {
        let auth = Arc::new(FailingAuth(AuthFailureKind::InvalidCredentials));
        let mut form = LoginController::new(auth);

        form.set_username("a001");
        form.set_password("wrong");
        let state = form.login().await;

        assert_eq!(state.phase(), LoginPhase::Failed);
        let message = state.error_message.as_deref().unwrap();
        assert!(!message.is_empty());
        assert_eq!(message, AuthFailureKind::InvalidCredentials.user_message());
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_each_failure_kind_maps_to_its_message() {
        for kind in [
            AuthFailureKind::NetworkError,
            AuthFailureKind::ServerError,
            AuthFailureKind::Unknown,
        ] {
            let mut form = LoginController::new(Arc::new(FailingAuth(kind)));
            form.set_username("a001");
            let state = form.login().await;
            assert_eq!(state.error_message.as_deref(), Some(kind.user_message()));
            assert!(state.accepts_input());
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_submitting_issues_no_call() {
        let auth = Arc::new(GatedAuth::default());
        let mut form = LoginController::new(Arc::clone(&auth));
        form.set_username("a001");
        form.set_password("secret");

        assert!(form.submit());
        yield_a_few().await;
        assert!(!form.submit());
        assert_eq!(form.phase(), LoginPhase::Submitting);

        auth.gate.notify_waiters();
        form.settle().await;

        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.phase(), LoginPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_poll_applies_result_once_available() {
        let auth = Arc::new(GatedAuth::default());
        let mut form = LoginController::new(Arc::clone(&auth));
        form.set_username("a001");
        form.submit();

        yield_a_few().await;
        assert!(!form.poll());
        assert_eq!(form.phase(), LoginPhase::Submitting);

        auth.gate.notify_waiters();
        tokio::time::timeout(Duration::from_secs(5), async {
            while !form.poll() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(form.phase(), LoginPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_subscribers_see_state_transitions() {
        let auth = Arc::new(GatedAuth::default());
        let mut form = LoginController::new(Arc::clone(&auth));
        let mut rx = form.subscribe();

        form.set_username("a001");
        assert_eq!(rx.borrow_and_update().username, "A001");

        form.submit();
        assert!(rx.borrow_and_update().is_loading);

        yield_a_few().await;
        auth.gate.notify_waiters();
        form.settle().await;
        let seen = rx.borrow_and_update().clone();
        assert!(seen.login_success);
        assert!(!seen.is_loading);
    }

    #[tokio::test]
    async fn test_edit_after_success_clears_success_flag() {
        let mut form = LoginController::new(Arc::new(StubAuth::default()));
        form.set_username("a001");
        form.set_password("secret");
        form.login().await;
        assert_eq!(form.phase(), LoginPhase::Succeeded);

        form.set_username("b002");
        assert!(!form.state().login_success);
        assert_eq!(form.phase(), LoginPhase::Editing);
    }

    #[tokio::test]
    async fn test_into_session_hands_off_only_on_success() {
        let mut form = LoginController::new(Arc::new(StubAuth::default()));
        form.set_username("a001");
        form.set_password("secret");
        form.login().await;
        assert_eq!(form.into_session(), Some(stub_session()));

        let mut form = LoginController::new(Arc::new(StubAuth::default()));
        form.set_username("a001");
        form.set_password("nope");
        form.login().await;
        assert_eq!(form.into_session(), None);
    }

    #[tokio::test]
    async fn test_dispose_discards_in_flight_result() {
        let auth = Arc::new(GatedAuth::default());
        let mut form = LoginController::new(Arc::clone(&auth));
        let rx = form.subscribe();
        form.set_username("a001");
        form.submit();
        yield_a_few().await;
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);

        form.dispose();
        auth.gate.notify_waiters();
        yield_a_few().await;

        assert_eq!(auth.completed.load(Ordering::SeqCst), 0);
        assert!(!rx.borrow().login_success);
    }

    #[tokio::test]
    async fn test_settle_without_submit_is_noop() {
        let mut form = LoginController::new(Arc::new(StubAuth::default()));
        form.settle().await;
        assert_eq!(form.phase(), LoginPhase::Idle);
    }
}
