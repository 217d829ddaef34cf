use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::{api_client, load_cli_config, save_cli_config};
use crate::cli::utils::{output_error, output_object, output_success, prompt_password};
use crate::cli::OutputFormat;
use crate::client::{token_expiry, is_token_valid};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = api_client(server)?;

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password: ")?,
            };
            let login = client.login(&username, &password).await?;

            // Remember the server that accepted us
            let mut config = load_cli_config()?;
            config.server_url = Some(client.base_url().to_string());
            save_cli_config(&config)?;

            output_success(
                &output_format,
                &format!("Logged in as {} on {}", username, client.base_url()),
                Some(json!({ "expires_at": login.expires_at })),
            )
        }
        AuthCommands::Logout => {
            client.logout().await?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let session = client.store().load()?.filter(|s| s.server == client.base_url());
            match session {
                Some(session) if is_token_valid(&session.token) => output_success(
                    &output_format,
                    &format!(
                        "Authenticated as {} on {}",
                        session.username.as_deref().unwrap_or("unknown"),
                        session.server
                    ),
                    Some(json!({
                        "server": session.server,
                        "username": session.username,
                        "expires_at": token_expiry(&session.token),
                    })),
                ),
                Some(_) => output_error(&output_format, "Session expired, run `finance auth login`", Some("TOKEN_EXPIRED")),
                None => output_error(&output_format, "Not logged in", Some("NOT_AUTHENTICATED")),
            }
        }
        AuthCommands::Whoami => {
            let identity: Value = client.get("/api/v1/auth/whoami").await?;
            output_object(&output_format, &identity)
        }
    }
}
