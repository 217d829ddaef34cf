use clap::Subcommand;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::{output_success, prompt_password};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::Database;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a local user in the configured database")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { username, password } => {
            let username = username.trim().to_string();
            if username.is_empty() {
                anyhow::bail!("username must not be blank");
            }
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password: ")?,
            };
            if password.is_empty() {
                anyhow::bail!("password must not be empty");
            }

            let db = Database::connect(&config::config().database).await?;
            db.migrate().await?;

            let password_hash = hash_password(&password)?;
            let result = db.users().create(&username, &password_hash).await;
            db.close().await;
            let user = result?;

            output_success(
                &output_format,
                &format!("User '{}' created", user.username),
                Some(json!({ "id": user.id, "username": user.username })),
            )
        }
    }
}
