use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::api_client;
use crate::cli::utils::{output_rows, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum MarcacaoCommands {
    #[command(about = "List classification triples")]
    List,

    #[command(about = "Add a classification triple")]
    Add {
        #[arg(help = "GRUPO")]
        grupo: String,
        #[arg(help = "SUBGRUPO")]
        subgrupo: String,
        #[arg(help = "TipoGasto")]
        tipo_gasto: String,
    },

    #[command(about = "Replace a classification triple")]
    Update {
        #[arg(help = "Marcação ID")]
        id: i64,
        #[arg(help = "GRUPO")]
        grupo: String,
        #[arg(help = "SUBGRUPO")]
        subgrupo: String,
        #[arg(help = "TipoGasto")]
        tipo_gasto: String,
    },

    #[command(about = "Delete a classification triple")]
    Rm {
        #[arg(help = "Marcação ID")]
        id: i64,
    },
}

pub async fn handle(cmd: MarcacaoCommands, server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = api_client(server)?;

    match cmd {
        MarcacaoCommands::List => {
            let rows: Vec<Value> = client.get("/api/v1/marcacoes").await?;
            output_rows(&output_format, &rows, &["id", "GRUPO", "SUBGRUPO", "TipoGasto"], "No marcações found")
        }
        MarcacaoCommands::Add { grupo, subgrupo, tipo_gasto } => {
            let body = json!({ "GRUPO": grupo, "SUBGRUPO": subgrupo, "TipoGasto": tipo_gasto });
            let created: Value = client.post("/api/v1/marcacoes", &body).await?;
            let id = created.get("id").cloned().unwrap_or(Value::Null);
            output_success(&output_format, &format!("Marcação {} created", id), Some(created))
        }
        MarcacaoCommands::Update { id, grupo, subgrupo, tipo_gasto } => {
            let body = json!({ "GRUPO": grupo, "SUBGRUPO": subgrupo, "TipoGasto": tipo_gasto });
            let updated: Value = client.put(&format!("/api/v1/marcacoes/{}", id), &body).await?;
            output_success(&output_format, &format!("Marcação {} updated", id), Some(updated))
        }
        MarcacaoCommands::Rm { id } => {
            client.delete(&format!("/api/v1/marcacoes/{}", id)).await?;
            output_success(&output_format, &format!("Marcação {} deleted", id), None)
        }
    }
}
