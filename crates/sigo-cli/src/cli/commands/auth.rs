//! Login and logout command handlers.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use sigo_core::auth::HttpAuthenticator;
use sigo_core::config::Config;
use sigo_core::login::{ActiveSession, LoginController, LoginPhase};
use sigo_core::session_store::{SessionStore, StoredSession};

/// Reads one line from stdin after printing `prompt` to stderr.
fn prompt_line(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Result<String> {
    let mut err = io::stderr();
    write!(err, "{prompt}")?;
    err.flush()?;
    let line = lines
        .next()
        .context("stdin closed before input was provided")?
        .context("read stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(config: &Config, username: Option<String>) -> Result<()> {
    let auth = Arc::new(HttpAuthenticator::from_config(config)?);
    let store = SessionStore::default_location();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let username = match username {
        Some(username) => username,
        None => prompt_line(&mut lines, "Usuario: ")?,
    };
    let password = prompt_line(&mut lines, "Contraseña: ")?;
    drop(lines);

    let mut form = LoginController::new(Arc::clone(&auth));
    form.set_username(&username);
    form.set_password(&password);
    drop(password);

    if form.submit() {
        eprintln!("Ingresando...");
    }
    form.settle().await;

    match form.phase() {
        LoginPhase::Succeeded => {
            let session = form
                .into_session()
                .context("login succeeded without a session")?;
            let stored = StoredSession::new(session, auth.session_cookies());
            if stored.server_cookie.is_none() {
                tracing::debug!("login response carried no session cookie");
            }
            store.save(&stored).context("store session")?;
            println!("Bienvenido {}", stored.session.person_full_name);
            Ok(())
        }
        _ => {
            let message = form
                .state()
                .error_message
                .clone()
                .unwrap_or_else(|| "No se pudo iniciar sesión.".to_string());
            anyhow::bail!(message)
        }
    }
}

pub async fn logout(config: &Config) -> Result<()> {
    let store = SessionStore::default_location();
    let Some(stored) = store.load().context("load session")? else {
        println!("No hay una sesión activa.");
        return Ok(());
    };

    let auth = HttpAuthenticator::from_config(config)?;
    if let Some(cookie) = &stored.server_cookie {
        auth.restore_session_cookies(cookie)?;
    }
    if let Err(failure) = ActiveSession::new(stored.session).logout(&auth).await {
        eprintln!("Advertencia: {}", failure.user_message());
    }

    store.clear().context("clear session")?;
    println!("Sesión cerrada.");
    Ok(())
}
