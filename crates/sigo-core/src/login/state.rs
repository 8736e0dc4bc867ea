//! Login form state.

use std::fmt;

use crate::session::Session;

/// Phase of the login form, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPhase {
    /// No input yet, nothing pending.
    Idle,
    /// Fields populated, nothing pending.
    Editing,
    /// Authentication call in flight.
    Submitting,
    /// Session attached.
    Succeeded,
    /// Error message attached.
    Failed,
}

/// UI-facing state of the login form.
///
/// `is_loading` never coexists with `error_message` or `login_success`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub user: Option<Session>,
    pub login_success: bool,
}

impl LoginState {
    pub fn phase(&self) -> LoginPhase {
        if self.is_loading {
            LoginPhase::Submitting
        } else if self.login_success {
            LoginPhase::Succeeded
        } else if self.error_message.is_some() {
            LoginPhase::Failed
        } else if self.username.is_empty() && self.password.is_empty() {
            LoginPhase::Idle
        } else {
            LoginPhase::Editing
        }
    }

    /// Input is accepted in every phase except `Submitting`.
    pub fn accepts_input(&self) -> bool {
        !self.is_loading
    }

    /// Drops the outcome of the previous attempt.
    pub(crate) fn clear_outcome(&mut self) {
        self.error_message = None;
        self.user = None;
        self.login_success = false;
    }
}

// Manual impl so the password never reaches logs.
impl fmt::Debug for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginState")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("is_loading", &self.is_loading)
            .field("error_message", &self.error_message)
            .field("user", &self.user)
            .field("login_success", &self.login_success)
            .finish()
    }
}
