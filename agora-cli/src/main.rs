mod app;
mod commands;
mod render;
mod utils;

use agora_core::event::parse_iso_date;
use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::App;

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Discover events, keep the ones you like, and sync them with the cloud")]
struct Cli {
    /// Use the local cache only; nothing is fetched from or sent to the remote store
    #[arg(long, global = true)]
    offline: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    #[command(group(ArgGroup::new("method").required(true).args(["email", "anonymous", "google", "facebook"])))]
    Login {
        /// Sign in with email and password (password is prompted)
        #[arg(long)]
        email: Option<String>,

        /// Continue as guest
        #[arg(long)]
        anonymous: bool,

        #[arg(long)]
        google: bool,

        #[arg(long)]
        facebook: bool,
    },
    /// Create an account with email and password
    Register {
        #[arg(long)]
        email: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Sync with the remote store and list every event
    Discover,
    /// List liked events
    MyEvents,
    /// Add a new event
    Add {
        title: String,

        #[arg(short, long)]
        location: String,

        /// Event date (dd/MM/yyyy)
        #[arg(short, long)]
        date: String,
    },
    /// Like an event
    Like {
        title: String,

        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Remove an event from your liked events
    Unlike {
        title: String,

        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Delete an event locally and remotely
    Delete {
        title: String,

        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Fetch new events from the remote store
    Sync,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("agora_core=debug,agora_cli=debug")
    } else {
        EnvFilter::try_from_env("AGORA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app = App::load(cli.offline)?;

    match cli.command {
        Commands::Login {
            email,
            anonymous: _,
            google,
            facebook,
        } => commands::login::run(&app, email, google, facebook).await,
        Commands::Register { email } => commands::register::run(&app, &email).await,
        Commands::Logout => commands::logout::run(&app).await,
        Commands::Discover => {
            app.require_session()?;
            commands::discover::run(&app).await
        }
        Commands::MyEvents => {
            app.require_session()?;
            commands::my_events::run(&app).await
        }
        Commands::Add {
            title,
            location,
            date,
        } => {
            app.require_session()?;
            commands::add::run(&app, &title, &location, &date).await
        }
        Commands::Like { title, date } => {
            app.require_session()?;
            commands::like::run(&app, &title, parse_iso_date(&date)?, true).await
        }
        Commands::Unlike { title, date } => {
            app.require_session()?;
            commands::like::run(&app, &title, parse_iso_date(&date)?, false).await
        }
        Commands::Delete { title, date, force } => {
            app.require_session()?;
            commands::delete::run(&app, &title, parse_iso_date(&date)?, force).await
        }
        Commands::Sync => {
            app.require_session()?;
            commands::sync::run(&app).await
        }
    }
}
