//! # sheet-cli
//!
//! CLI tool for exercising the gShell user-access API.
//!
//! ## Commands
//!
//! - `init`: Store the access key and hosts
//! - `register` / `login` / `logout`: Manage the account and session
//! - `row`: Read and write your own rows
//! - `public`: Read and patch rows owned by other users
//! - `listen` / `emit`: Use the realtime channel
//! - `normalize`: Reshape list columns of a JSON file offline
//! - `status`: Show the local profile and session
//!
//! ## Example
//!
//! ```bash
//! sheet-cli init --access-key ak_live_123
//! sheet-cli login ada
//! sheet-cli row list orders --filter status=open --list tags
//! sheet-cli listen --event chat
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::init::InitOptions;
use commands::public::PublicCommand;
use commands::rows::RowCommand;
use commands::{auth, init, listen, normalize, parse_value, public, rows, status};

/// CLI tool for exercising the gShell user-access API.
#[derive(Parser, Debug)]
#[command(name = "sheet-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the profile and session
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the REST base URL for this invocation
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the access key and hosts
    Init {
        /// Access key for every call
        #[arg(long)]
        access_key: String,

        /// Realtime server URL
        #[arg(long)]
        realtime_url: Option<String>,

        /// User id for the realtime channel
        #[arg(long)]
        user_id: Option<String>,

        /// Overwrite an existing profile
        #[arg(long)]
        force: bool,
    },

    /// Create an account
    Register {
        /// Account row as a JSON object
        form: String,

        /// Role to register under
        #[arg(long, default_value = sheet_core::DEFAULT_ROLE)]
        role: String,
    },

    /// Log in and store the session
    Login {
        /// Account name
        username: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out and forget the session
    Logout,

    /// Your own rows
    #[command(subcommand)]
    Row(RowCommand),

    /// Rows owned by other users
    #[command(subcommand)]
    Public(PublicCommand),

    /// Print realtime events until Ctrl-C
    Listen {
        /// Event name to print (repeatable)
        #[arg(long = "event", value_name = "NAME")]
        events: Vec<String>,

        /// Override the realtime URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Send one realtime event
    Emit {
        /// Event name
        event: String,

        /// Payload (JSON, or a plain string)
        #[arg(default_value = "null")]
        payload: String,

        /// Override the realtime URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Normalize list columns of a JSON array of rows
    Normalize {
        /// Input file, or - for standard input
        #[arg(long, short)]
        file: PathBuf,

        /// Treat COLUMN as a list column (repeatable)
        #[arg(long = "list", value_name = "COLUMN")]
        lists: Vec<String>,

        /// Column types as a JSON object, e.g. '{"tags":"list"}'
        #[arg(long)]
        types: Option<String>,
    },

    /// Show the local profile and session
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Offline command: no data directory needed
    if let Commands::Normalize { file, lists, types } = &cli.command {
        return normalize::run(file, lists, types.as_deref()).await;
    }

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let base_url = cli.base_url.as_deref();

    match cli.command {
        Commands::Init {
            access_key,
            realtime_url,
            user_id,
            force,
        } => {
            let options = InitOptions {
                access_key: &access_key,
                base_url,
                realtime_url: realtime_url.as_deref(),
                user_id: user_id.as_deref(),
                force,
            };
            init::run(&data_dir, options).await?;
        }
        Commands::Register { form, role } => {
            auth::run_register(&data_dir, base_url, &form, &role).await?;
        }
        Commands::Login { username, password } => {
            auth::run_login(&data_dir, base_url, &username, password).await?;
        }
        Commands::Logout => {
            auth::run_logout(&data_dir, base_url).await?;
        }
        Commands::Row(command) => {
            rows::run(&data_dir, base_url, command).await?;
        }
        Commands::Public(command) => {
            public::run(&data_dir, base_url, command).await?;
        }
        Commands::Listen { events, url } => {
            listen::run_listen(&data_dir, url.as_deref(), &events).await?;
        }
        Commands::Emit {
            event,
            payload,
            url,
        } => {
            listen::run_emit(&data_dir, url.as_deref(), &event, parse_value(&payload)).await?;
        }
        Commands::Status => {
            status::run(&data_dir).await?;
        }
        Commands::Normalize { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Get the default data directory for sheet-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("cloud", "gshell", "sheet-cli")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
