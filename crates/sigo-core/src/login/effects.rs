//! Login effect types.
//!
//! Effects are commands returned by the reducer that the controller executes.
//! The reducer only mutates state; spawning the authentication call and
//! cancelling it happen in the controller.

/// Effects returned by [`super::update`] for the controller to execute.
#[derive(PartialEq, Eq)]
pub enum LoginEffect {
    /// Spawn the authentication call with a snapshot of the credentials.
    SpawnLogin { username: String, password: String },

    /// Cancel the in-flight authentication call.
    CancelLogin,
}

impl std::fmt::Debug for LoginEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginEffect::SpawnLogin { username, .. } => f
                .debug_struct("SpawnLogin")
                .field("username", username)
                .finish_non_exhaustive(),
            LoginEffect::CancelLogin => write!(f, "CancelLogin"),
        }
    }
}
