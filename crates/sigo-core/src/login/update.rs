//! Login reducer.
//!
//! All login form state transitions happen here. The controller feeds events
//! in and executes the returned effects.

use super::effects::LoginEffect;
use super::state::LoginState;
use crate::auth::AuthResult;
use crate::session::Session;

/// Inputs to the login reducer.
#[derive(Debug)]
pub enum LoginEvent {
    UsernameChanged(String),
    PasswordChanged(String),
    SubmitRequested,
    /// Result of the active authentication call. Stale results are filtered
    /// out by the controller before they get here.
    LoginFinished(AuthResult<Session>),
    /// The owning screen is going away.
    Disposed,
}

/// Applies `event` to `state` and returns effects for the controller.
pub fn update(state: &mut LoginState, event: LoginEvent) -> Vec<LoginEffect> {
    match event {
        LoginEvent::UsernameChanged(text) => {
            if state.accepts_input() {
                state.username = text.to_uppercase();
                state.clear_outcome();
            }
            vec![]
        }
        LoginEvent::PasswordChanged(text) => {
            if state.accepts_input() {
                state.password = text;
                state.clear_outcome();
            }
            vec![]
        }
        LoginEvent::SubmitRequested => {
            if state.is_loading {
                return vec![];
            }
            state.clear_outcome();
            state.is_loading = true;
            vec![LoginEffect::SpawnLogin {
                username: state.username.clone(),
                password: state.password.clone(),
            }]
        }
        LoginEvent::LoginFinished(result) => {
            if !state.is_loading {
                return vec![];
            }
            state.is_loading = false;
            match result {
                Ok(session) => {
                    state.user = Some(session);
                    state.login_success = true;
                }
                Err(failure) => {
                    state.error_message = Some(failure.user_message().to_string());
                }
            }
            vec![]
        }
        LoginEvent::Disposed => {
            if state.is_loading {
                state.is_loading = false;
                vec![LoginEffect::CancelLogin]
            } else {
                vec![]
            }
        }
    }
}
