pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "finance")]
#[command(about = "Finance CLI - Command-line client for the personal finance API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL (defaults to FINANCE_API_URL or saved config)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and classify transactions")]
    Transactions {
        #[command(subcommand)]
        cmd: commands::transactions::TransactionCommands,
    },

    #[command(about = "Manage classification triples (GRUPO / SUBGRUPO / TipoGasto)")]
    Marcacoes {
        #[command(subcommand)]
        cmd: commands::marcacoes::MarcacaoCommands,
    },

    #[command(about = "Dashboard metrics and breakdowns")]
    Dashboard {
        #[command(subcommand)]
        cmd: commands::dashboard::DashboardCommands,
    },

    #[command(about = "Show bank/file-format compatibility")]
    Compat,

    #[command(about = "Local user administration (direct database access)")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server.as_deref();

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, server, output_format).await,
        Commands::Transactions { cmd } => commands::transactions::handle(cmd, server, output_format).await,
        Commands::Marcacoes { cmd } => commands::marcacoes::handle(cmd, server, output_format).await,
        Commands::Dashboard { cmd } => commands::dashboard::handle(cmd, server, output_format).await,
        Commands::Compat => commands::compat::handle(server, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
    }
}
