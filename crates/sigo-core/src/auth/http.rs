//! HTTP implementation of the authentication collaborator.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde_json::Value;

use super::{AuthFailure, AuthResult, Authenticator};
use crate::config::Config;
use crate::session::Session;

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Authenticates against the portal backend over HTTP.
///
/// The backend tracks the signed-in user with a cookie. Within one process
/// the client's jar carries it from `login` to `logout`; across processes
/// the caller reads it with `session_cookies` after login and seeds a new
/// client with `restore_session_cookies` before logout.
pub struct HttpAuthenticator {
    base_url: String,
    http: reqwest::Client,
    cookies: Arc<Jar>,
}

impl HttpAuthenticator {
    /// Creates a client for `base_url`. `timeout` of `None` disables the
    /// request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&cookies));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            http,
            cookies,
        })
    }

    /// Creates a client from the `[api]` section, honoring `SIGO_BASE_URL`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api.effective_base_url()?;
        Self::new(base_url, config.api.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Cookie` header value the backend would receive on logout, if the
    /// server handed out a session cookie.
    pub fn session_cookies(&self) -> Option<String> {
        let url = self.logout_url().ok()?;
        let header = self.cookies.cookies(&url)?;
        header.to_str().ok().map(str::to_string)
    }

    /// Seeds the jar with a header previously returned by `session_cookies`.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse.
    pub fn restore_session_cookies(&self, header: &str) -> Result<()> {
        let url = self.logout_url()?;
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies.add_cookie_str(pair, &url);
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn logout_url(&self) -> Result<Url> {
        let url = self.url(LOGOUT_PATH);
        Url::parse(&url).with_context(|| format!("invalid logout URL {url}"))
    }
}

impl Authenticator for HttpAuthenticator {
    async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
        let url = self.url(LOGIN_PATH);
        tracing::debug!(%url, %username, "sending login request");

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| failure_from_transport(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| failure_from_transport(&e))?;

        if !(200..300).contains(&status) {
            return Err(failure_from_status(status, &body));
        }

        Session::from_json(&body).map_err(|e| {
            AuthFailure::unknown("malformed login response").with_details(e.to_string())
        })
    }

    async fn logout(&self) -> AuthResult<()> {
        let url = self.url(LOGOUT_PATH);
        tracing::debug!(%url, "sending logout request");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| failure_from_transport(&e))?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(failure_from_status(status, &body))
    }
}

/// Maps a transport-level reqwest error to a failure kind.
fn failure_from_transport(err: &reqwest::Error) -> AuthFailure {
    if err.is_decode() || err.is_body() {
        return AuthFailure::unknown("failed to read response").with_details(err.to_string());
    }
    if err.is_timeout() {
        return AuthFailure::network("request timed out").with_details(err.to_string());
    }
    AuthFailure::network("could not reach server").with_details(err.to_string())
}

/// Maps a non-2xx HTTP status to a failure kind.
fn failure_from_status(status: u16, body: &str) -> AuthFailure {
    let message = match extract_error_message(body) {
        Some(msg) => format!("HTTP {status}: {msg}"),
        None => format!("HTTP {status}"),
    };
    let failure = match status {
        401 | 403 => AuthFailure::invalid_credentials(),
        500..=599 => AuthFailure::server(message),
        _ => AuthFailure::unknown(message),
    };
    if body.is_empty() {
        failure
    } else {
        failure.with_details(body)
    }
}

/// Pulls a human-readable message out of `{"message": ..}` or
/// `{"error": {"message": ..}}` bodies.
fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .or_else(|| json.get("error").and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
