//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use sigo_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "sigo")]
#[command(version)]
#[command(about = "SIGO UTM student portal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in (the password is read from stdin)
    Login {
        /// Username; read from stdin before the password when omitted
        #[arg(short, long, env = "SIGO_USERNAME")]
        username: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the dashboard for the signed-in user
    Dashboard,
    /// Show the signed-in user's profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Edit the personal-information form (kept locally, not sent to the server)
    Edit(commands::portal::ProfileEditArgs),
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Show the effective settings, environment overrides included
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config.log).context("init logging")?;

    match cli.command {
        Commands::Login { username } => commands::auth::login(&config, username).await,
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Dashboard => commands::portal::dashboard(),
        Commands::Profile { command } => match command {
            None => commands::portal::profile(),
            Some(ProfileCommands::Edit(args)) => commands::portal::profile_edit(&args),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show => commands::config::show(&config),
        },
    }
}
