//! Profile screen: read-only account rows plus a locally edited form.
//!
//! The form has no backend write contract. `save` records the values in the
//! log and nothing else.

use crate::session::Session;

const DEFAULT_BIRTH_STATE: &str = "Michoacán de Ocampo";

/// Read-only rows shown for the account, in display order.
pub fn account_rows(session: &Session) -> Vec<(&'static str, String)> {
    vec![
        ("Perfil", session.profile_name.clone()),
        ("Usuario", session.username.clone()),
        ("Correo", session.email.clone()),
        ("Roles", session.roles.join(", ")),
        ("ID Persona", session.person_id.to_string()),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Hombre",
            Sex::Female => "Mujer",
        }
    }

    /// Parses either the display label or its English name, case-insensitively.
    pub fn from_label(label: &str) -> Option<Sex> {
        match label.trim().to_lowercase().as_str() {
            "hombre" | "male" => Some(Sex::Male),
            "mujer" | "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Personal-information form on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub curp: String,
    pub nss: String,
    pub sex: Sex,
    pub birth_state: String,
}

impl ProfileForm {
    /// Prefills the name from the session; everything else starts at defaults.
    pub fn from_session(session: &Session) -> Self {
        Self {
            full_name: session.person_full_name.clone(),
            curp: String::new(),
            nss: String::new(),
            sex: Sex::default(),
            birth_state: DEFAULT_BIRTH_STATE.to_string(),
        }
    }

    pub fn set_full_name(&mut self, text: &str) {
        self.full_name = text.to_string();
    }

    pub fn set_curp(&mut self, text: &str) {
        self.curp = text.to_string();
    }

    pub fn set_nss(&mut self, text: &str) {
        self.nss = text.to_string();
    }

    pub fn set_sex(&mut self, sex: Sex) {
        self.sex = sex;
    }

    pub fn set_birth_state(&mut self, text: &str) {
        self.birth_state = text.to_string();
    }

    /// Records the current values. Nothing is sent anywhere.
    pub fn save(&self) {
        tracing::info!(
            full_name = %self.full_name,
            curp = %self.curp,
            nss = %self.nss,
            sex = self.sex.label(),
            birth_state = %self.birth_state,
            "profile changes recorded locally"
        );
    }
}
