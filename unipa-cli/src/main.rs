//! UNIPA portal CLI.

mod commands;
mod config;
mod handlers;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{bulletin, timetable};

/// UNIPA portal CLI
#[derive(Parser)]
#[command(name = "unipa")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Bulletin board operations
    #[command(alias = "b")]
    Bulletin {
        #[command(subcommand)]
        action: bulletin::BulletinAction,
    },

    /// Timetable operations
    #[command(alias = "t")]
    Timetable {
        #[command(subcommand)]
        action: timetable::TimetableAction,
    },

    /// List functions the portal enables for this user
    Services,

    /// Show the unread bulletin count
    Unread,

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Login with user id and password
    Login {
        /// Portal user id
        user_id: String,
        /// Password (or set UNIPA_PASSWORD)
        #[arg(short, long, env = "UNIPA_PASSWORD", hide_env_values = true)]
        password: String,
        /// Portal base address, e.g. https://unipa.example.ac.jp
        #[arg(short, long)]
        base_url: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Probe whether the stored session is still authenticated
    Status,
    /// Print the stored session snapshot as JSON
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Auth { action } => handle_auth(action).await,
        Commands::Bulletin { action } => bulletin::handle(action, cli.format, cli.verbose).await,
        Commands::Timetable { action } => timetable::handle(action, cli.format).await,
        Commands::Services => {
            let client = config::build_authed_client()?;
            let menu = client.menu().services().await?;
            println!("Max semester: {}", menu.max_semester_no);
            for func_id in &menu.enabled_func_ids {
                println!("{func_id}");
            }
            Ok(())
        }
        Commands::Unread => {
            let client = config::build_authed_client()?;
            let count = client.bulletins().unread_count().await?;
            println!("{count}");
            Ok(())
        }
        Commands::Config => {
            let cfg = config::load_config()?;
            println!("Config file: {}", config::config_path()?.display());
            println!(
                "Portal: {}",
                cfg.base_url.as_deref().unwrap_or("(not configured)")
            );
            println!("Session stored: {}", cfg.session.is_some());
            if let Some(session) = &cfg.session {
                println!("User id: {}", session.user_id);
            }
            Ok(())
        }
    }
}

async fn handle_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login {
            user_id,
            password,
            base_url,
        } => {
            let mut cfg = config::load_config()?;
            if let Some(url) = base_url {
                cfg.base_url = Some(url);
            }

            // a fresh login never reuses a stale session
            cfg.session = None;
            let client = config::build_client_for(&cfg)?;
            let result = client.session().login(&user_id, &password).await?;

            cfg.session = client.session().export();
            config::save_config(&cfg)?;

            println!(
                "Logged in as {}",
                result.display_name.as_deref().unwrap_or(&user_id)
            );
            Ok(())
        }
        AuthAction::Logout => {
            let mut cfg = config::load_config()?;
            cfg.session = None;
            config::save_config(&cfg)?;
            println!("Logged out");
            Ok(())
        }
        AuthAction::Status => {
            let client = config::build_authed_client()?;
            if client.session().check_auth_status().await? {
                println!("Session is authenticated");
            } else {
                println!("Session has expired");
            }
            Ok(())
        }
        AuthAction::Export => {
            let cfg = config::load_config()?;
            let session = cfg
                .session
                .context("Not logged in. Run 'unipa auth login' first.")?;
            println!("{}", serde_json::to_string(&session)?);
            Ok(())
        }
    }
}
