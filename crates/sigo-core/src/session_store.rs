//! On-disk session handoff.
//!
//! Stores the signed-in user's record in `<base>/session.json` with
//! restricted permissions (0600) so later commands can pick it up. The record
//! is written as its flat field map and read back through the strict field
//! decoder. Next to it sits the backend's session cookie, which `logout`
//! needs to end the server-side session. Credentials never touch disk.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::session::{Session, SessionFields};

/// A signed-in session as carried between commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub session: Session,
    /// `Cookie` header identifying the session to the backend.
    pub server_cookie: Option<String>,
}

impl StoredSession {
    pub fn new(session: Session, server_cookie: Option<String>) -> Self {
        Self {
            session,
            server_cookie,
        }
    }
}

impl From<Session> for StoredSession {
    fn from(session: Session) -> Self {
        Self::new(session, None)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionFile {
    fields: SessionFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server_cookie: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at ${SIGO_HOME}/session.json.
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session, or None if nobody is signed in.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        let file: SessionFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;
        let session = Session::from_fields(&file.fields)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;

        Ok(Some(StoredSession::new(session, file.server_cookie)))
    }

    /// Saves `stored`, replacing any previous session.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, stored: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = SessionFile {
            fields: stored.session.to_fields(),
            server_cookie: stored.server_cookie.clone(),
        };
        let contents = serde_json::to_string_pretty(&file).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            // mode() only applies on create; tighten a pre-existing file too.
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict {}", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Removes the stored session and its cookie. Returns true if one existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}
