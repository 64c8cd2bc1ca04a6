use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(about = "Staffdesk CLI - sign in and search the employee directory", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "STAFFDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a token or with credentials
    Login {
        /// Bearer token issued by the backend
        #[arg(long, conflicts_with_all = ["email", "password"])]
        token: Option<String>,
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in identity
    Whoami {
        /// Print the session state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search employees, departments and branches
    Search {
        text: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let context = bootstrap::Context::load(cli.config)?;
    init_tracing(&context.config.logging.level)?;

    match cli.command {
        Commands::Login {
            token,
            email,
            password,
        } => commands::auth::login(&context, token, email, password).await?,
        Commands::Logout => commands::auth::logout(&context)?,
        Commands::Whoami { json } => commands::auth::whoami(&context, json).await?,
        Commands::Search { text, json } => commands::search::run(&context, &text, json).await?,
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level (which `STAFFDESK_LOG` overrides).
fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
