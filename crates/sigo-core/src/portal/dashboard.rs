//! Dashboard view model.

use crate::session::Session;

const FALLBACK_TITLE: &str = "Alumno UTM";

/// Entries offered on the dashboard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    AcademicHistory,
    Profile,
    Logout,
}

impl MenuEntry {
    pub fn all() -> &'static [MenuEntry] {
        &[MenuEntry::AcademicHistory, MenuEntry::Profile, MenuEntry::Logout]
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::AcademicHistory => "Mi historial académico",
            MenuEntry::Profile => "Mi perfil",
            MenuEntry::Logout => "Cerrar Sesión",
        }
    }

    pub fn description(self) -> Option<&'static str> {
        match self {
            MenuEntry::AcademicHistory => Some("Estatus, materias y calificaciones."),
            MenuEntry::Profile => Some("Datos personales y de contacto."),
            MenuEntry::Logout => None,
        }
    }
}

/// What the dashboard shows for a signed-in user.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    session: &'a Session,
}

impl<'a> Dashboard<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Header title: the username, or a generic label when blank.
    pub fn title(&self) -> &'a str {
        let username = self.session.username.trim();
        if username.is_empty() {
            FALLBACK_TITLE
        } else {
            username
        }
    }

    /// First word of the full name, used in the greeting.
    pub fn first_name(&self) -> &'a str {
        self.session
            .person_full_name
            .split_whitespace()
            .next()
            .unwrap_or("")
    }
}
