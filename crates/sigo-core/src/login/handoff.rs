//! Session held by the portal after the login form hands it off.

use crate::auth::{AuthResult, Authenticator};
use crate::session::Session;

/// The signed-in user, owned by the presentation layer after login.
///
/// Logging out consumes the value, so no reference to the session survives
/// the logout call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    session: Session,
}

impl ActiveSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replaces the held record after a re-login.
    pub fn replace(&mut self, session: Session) {
        self.session = session;
    }

    /// Invalidates the session through `auth` and drops it.
    ///
    /// The local record is discarded even when the backend call fails; the
    /// failure is returned so the caller can report it.
    ///
    /// # Errors
    /// Returns the collaborator's failure.
    pub async fn logout<A: Authenticator>(self, auth: &A) -> AuthResult<()> {
        let username = self.session.username.clone();
        drop(self);
        let result = auth.logout().await;
        match &result {
            Ok(()) => tracing::info!(%username, "logged out"),
            Err(failure) => {
                tracing::warn!(%username, kind = %failure.kind, message = %failure.message, "logout failed");
            }
        }
        result
    }
}

impl From<Session> for ActiveSession {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
