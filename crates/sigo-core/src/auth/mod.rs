//! Authentication collaborator boundary.
//!
//! The login state machine never talks to the network directly. It is handed
//! an [`Authenticator`] at construction time and delegates credential
//! verification and logout to it.

mod http;

use std::fmt;
use std::future::Future;

pub use http::HttpAuthenticator;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Verifies credentials and invalidates sessions.
///
/// Implementations must be shareable across tasks: the login runtime spawns
/// each call onto the tokio executor.
pub trait Authenticator: Send + Sync + 'static {
    /// Verifies `(username, password)` and returns the user's session.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<Session>> + Send;

    /// Invalidates the current session server-side.
    fn logout(&self) -> impl Future<Output = AuthResult<()>> + Send;
}

/// Failure category reported by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailureKind {
    /// Wrong username or password. User-correctable.
    InvalidCredentials,
    /// Backend unreachable or the request timed out. Retry is allowed.
    NetworkError,
    /// Backend answered with a 5xx.
    ServerError,
    /// Anything else (unexpected status, malformed body).
    Unknown,
}

impl AuthFailureKind {
    /// Message shown to the user on the login form.
    pub fn user_message(self) -> &'static str {
        match self {
            AuthFailureKind::InvalidCredentials => "Usuario o contraseña incorrectos.",
            AuthFailureKind::NetworkError => {
                "No hay conexión con el servidor. Revisa tu red e inténtalo de nuevo."
            }
            AuthFailureKind::ServerError => {
                "El servidor no está disponible en este momento. Inténtalo más tarde."
            }
            AuthFailureKind::Unknown => "Ocurrió un error inesperado al iniciar sesión.",
        }
    }
}

impl fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailureKind::InvalidCredentials => write!(f, "invalid_credentials"),
            AuthFailureKind::NetworkError => write!(f, "network_error"),
            AuthFailureKind::ServerError => write!(f, "server_error"),
            AuthFailureKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Structured failure from the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFailure {
    /// Error category
    pub kind: AuthFailureKind,
    /// One-line summary for logs
    pub message: String,
    /// Optional raw details (e.g., response body)
    pub details: Option<String>,
}

impl AuthFailure {
    pub fn new(kind: AuthFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_credentials() -> Self {
        Self::new(AuthFailureKind::InvalidCredentials, "invalid credentials")
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AuthFailureKind::NetworkError, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(AuthFailureKind::ServerError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AuthFailureKind::Unknown, message)
    }

    /// Message shown to the user; depends only on the kind.
    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AuthFailure {}

pub type AuthResult<T> = std::result::Result<T, AuthFailure>;
