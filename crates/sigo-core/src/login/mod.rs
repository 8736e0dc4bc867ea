//! Login form state machine (state/update/effects plus the controller that
//! runs them).

mod controller;
mod effects;
mod handoff;
mod state;
mod task;
mod update;

pub use controller::LoginController;
pub use effects::LoginEffect;
pub use handoff::ActiveSession;
pub use state::{LoginPhase, LoginState};
pub use task::{TaskCompleted, TaskId, TaskSeq, TaskState};
pub use update::{LoginEvent, update};
