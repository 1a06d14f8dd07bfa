//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use docchat_core::config::{Config, paths};
use docchat_core::logging::{self, LogTarget};

mod commands;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(version)]
#[command(about = "Chat with an AI about your documents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chat server base URL (overrides config)
    #[arg(long, global = true, env = "DOCCHAT_SERVER_URL", value_name = "URL")]
    server: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,

    /// Log in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored login
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists your sessions, newest first
    List,
    /// Prints a session's transcript
    Show {
        #[arg(value_name = "SESSION_ID")]
        id: i64,
    },
    /// Renames a session
    Rename {
        #[arg(value_name = "SESSION_ID")]
        id: i64,
        /// New title for the session
        #[arg(value_name = "TITLE")]
        title: String,
    },
    /// Deletes a session and its messages
    Delete {
        #[arg(value_name = "SESSION_ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;

    if let Some(server) = cli.server.as_deref() {
        let server = server.trim();
        if !server.is_empty() {
            config.server_url = server.to_string();
        }
    }

    // default to chat mode
    let command = cli.command.unwrap_or(Commands::Chat);

    // The chat UI owns the terminal; everything else may log to stderr.
    let logs_dir = paths::logs_dir();
    let target = if matches!(command, Commands::Chat) {
        LogTarget::File { dir: &logs_dir }
    } else {
        LogTarget::Stderr
    };
    let _log_guard = logging::init(&target, &config.log_level)?;

    match command {
        Commands::Chat => commands::chat::run(&config),
        Commands::Login { email, password } => {
            commands::auth::login(&config, &email, &password).await
        }
        Commands::Register { email, password } => {
            commands::auth::register(&config, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(),

        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions::list(&config).await,
            SessionCommands::Show { id } => commands::sessions::show(&config, id).await,
            SessionCommands::Rename { id, title } => {
                commands::sessions::rename(&config, id, &title).await
            }
            SessionCommands::Delete { id } => commands::sessions::delete(&config, id).await,
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
