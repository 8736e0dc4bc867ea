//! Dashboard and profile command handlers.

use anyhow::{Context, Result};
use sigo_core::portal::{Dashboard, MenuEntry, ProfileForm, Sex, account_rows};
use sigo_core::session::Session;
use sigo_core::session_store::SessionStore;

#[derive(clap::Args, Debug)]
pub struct ProfileEditArgs {
    /// Full name
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub curp: Option<String>,
    #[arg(long)]
    pub nss: Option<String>,
    /// "Hombre" or "Mujer"
    #[arg(long, value_parser = parse_sex)]
    pub sex: Option<Sex>,
    #[arg(long)]
    pub birth_state: Option<String>,
}

fn parse_sex(value: &str) -> Result<Sex, String> {
    Sex::from_label(value).ok_or_else(|| format!("expected \"Hombre\" or \"Mujer\", got {value:?}"))
}

fn require_session() -> Result<Session> {
    let stored = SessionStore::default_location()
        .load()
        .context("load session")?
        .context("No hay una sesión activa. Ejecuta `sigo login` primero.")?;
    Ok(stored.session)
}

/// Command that opens a dashboard entry; None when the CLI has no screen for it.
fn menu_command(entry: MenuEntry) -> Option<&'static str> {
    match entry {
        MenuEntry::AcademicHistory => None,
        MenuEntry::Profile => Some("sigo profile"),
        MenuEntry::Logout => Some("sigo logout"),
    }
}

pub fn dashboard() -> Result<()> {
    let session = require_session()?;
    let view = Dashboard::new(&session);

    println!("SIGO UTM · {}", view.title());
    println!("Bienvenido");
    println!("{}", view.first_name());
    println!();
    for &entry in MenuEntry::all() {
        let action = menu_command(entry).map_or_else(
            || "(no disponible)".to_string(),
            |command| format!("[{command}]"),
        );
        match entry.description() {
            Some(description) => println!("  {}: {description} {action}", entry.label()),
            None => println!("  {} {action}", entry.label()),
        }
    }
    Ok(())
}

pub fn profile() -> Result<()> {
    let session = require_session()?;

    println!("{}", session.person_full_name);
    println!(
        "{}",
        if session.active { "Cuenta activa" } else { "Cuenta inactiva" }
    );
    println!();
    for (label, value) in account_rows(&session) {
        println!("{label}: {value}");
    }
    Ok(())
}

pub fn profile_edit(args: &ProfileEditArgs) -> Result<()> {
    let session = require_session()?;
    let mut form = ProfileForm::from_session(&session);

    if let Some(full_name) = &args.full_name {
        form.set_full_name(full_name);
    }
    if let Some(curp) = &args.curp {
        form.set_curp(curp);
    }
    if let Some(nss) = &args.nss {
        form.set_nss(nss);
    }
    if let Some(sex) = args.sex {
        form.set_sex(sex);
    }
    if let Some(birth_state) = &args.birth_state {
        form.set_birth_state(birth_state);
    }
    form.save();

    println!("Nombre completo: {}", form.full_name);
    println!("CURP: {}", form.curp);
    println!("NSS: {}", form.nss);
    println!("Sexo: {}", form.sex.label());
    println!("Estado de nacimiento: {}", form.birth_state);
    println!();
    println!("Cambios guardados localmente. No se enviaron al servidor.");
    Ok(())
}
