//! Authenticated user record.
//!
//! A `Session` is produced by the authentication backend and never mutated
//! afterwards; re-login replaces it wholesale.
//!
//! Two encodings are supported:
//! - JSON with the backend's camelCase field names (`from_json`), used to
//!   read the login response.
//! - A flat key/value map (`to_fields` / `from_fields`) for handing the record
//!   between commands through the session store. Decoding is strict: missing,
//!   unknown or malformed keys fail with a `SessionDecodeError` instead of
//!   producing empty fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flat key/value representation of a session.
pub type SessionFields = BTreeMap<String, String>;

const KEY_PERSON_ID: &str = "person_id";
const KEY_PERSON_FULL_NAME: &str = "person_full_name";
const KEY_USERNAME: &str = "username";
const KEY_EMAIL: &str = "email";
const KEY_PROFILE_NAME: &str = "profile_name";
const KEY_ROLES: &str = "roles";
const KEY_ACTIVE: &str = "active";

const ALL_KEYS: [&str; 7] = [
    KEY_PERSON_ID,
    KEY_PERSON_FULL_NAME,
    KEY_USERNAME,
    KEY_EMAIL,
    KEY_PROFILE_NAME,
    KEY_ROLES,
    KEY_ACTIVE,
];

/// The authenticated user's identity, profile linkage and roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub person_id: i64,
    pub person_full_name: String,
    pub username: String,
    pub email: String,
    pub profile_name: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl Session {
    /// Encodes the session as a flat key/value map.
    pub fn to_fields(&self) -> SessionFields {
        let roles = serde_json::Value::from(self.roles.clone()).to_string();
        let mut fields = SessionFields::new();
        fields.insert(KEY_PERSON_ID.to_string(), self.person_id.to_string());
        fields.insert(
            KEY_PERSON_FULL_NAME.to_string(),
            self.person_full_name.clone(),
        );
        fields.insert(KEY_USERNAME.to_string(), self.username.clone());
        fields.insert(KEY_EMAIL.to_string(), self.email.clone());
        fields.insert(KEY_PROFILE_NAME.to_string(), self.profile_name.clone());
        fields.insert(KEY_ROLES.to_string(), roles);
        fields.insert(KEY_ACTIVE.to_string(), self.active.to_string());
        fields
    }

    /// Decodes a session from a flat key/value map.
    ///
    /// # Errors
    /// Returns an error if a key is missing, unknown, or holds a value of the
    /// wrong shape.
    pub fn from_fields(fields: &SessionFields) -> Result<Self, SessionDecodeError> {
        if let Some(unknown) = fields.keys().find(|k| !ALL_KEYS.contains(&k.as_str())) {
            return Err(SessionDecodeError::UnexpectedField(unknown.clone()));
        }

        let person_id = required(fields, KEY_PERSON_ID)?;
        let person_id = person_id
            .parse::<i64>()
            .map_err(|e| SessionDecodeError::invalid(KEY_PERSON_ID, person_id, &e))?;

        let roles = required(fields, KEY_ROLES)?;
        let roles = serde_json::from_str::<Vec<String>>(roles)
            .map_err(|e| SessionDecodeError::invalid(KEY_ROLES, roles, &e))?;

        let active = required(fields, KEY_ACTIVE)?;
        let active = active
            .parse::<bool>()
            .map_err(|e| SessionDecodeError::invalid(KEY_ACTIVE, active, &e))?;

        Ok(Self {
            person_id,
            person_full_name: required(fields, KEY_PERSON_FULL_NAME)?.to_string(),
            username: required(fields, KEY_USERNAME)?.to_string(),
            email: required(fields, KEY_EMAIL)?.to_string(),
            profile_name: required(fields, KEY_PROFILE_NAME)?.to_string(),
            roles,
            active,
        })
    }

    /// Parses a session from the backend's JSON shape. Every field is required.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a field is missing.
    pub fn from_json(json: &str) -> Result<Self, SessionDecodeError> {
        serde_json::from_str(json).map_err(|e| SessionDecodeError::Json(e.to_string()))
    }
}

fn required<'a>(fields: &'a SessionFields, key: &'static str) -> Result<&'a str, SessionDecodeError> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or(SessionDecodeError::MissingField(key))
}

/// Typed failure when decoding a session from handoff data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDecodeError {
    MissingField(&'static str),
    UnexpectedField(String),
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
    Json(String),
}

impl SessionDecodeError {
    fn invalid(field: &'static str, value: &str, reason: &dyn fmt::Display) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for SessionDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "session field '{field}' is missing"),
            Self::UnexpectedField(field) => write!(f, "unexpected session field '{field}'"),
            Self::InvalidField {
                field,
                value,
                reason,
            } => write!(f, "invalid session field '{field}' = {value:?}: {reason}"),
            Self::Json(msg) => write!(f, "invalid session JSON: {msg}"),
        }
    }
}

impl std::error::Error for SessionDecodeError {}
