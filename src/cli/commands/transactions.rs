use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::config::api_client;
use crate::cli::utils::{output_object, output_rows, output_success};
use crate::cli::OutputFormat;

const COLUMNS: &[&str] = &["id", "Data", "Estabelecimento", "Valor", "TipoTransacao", "GRUPO", "SUBGRUPO", "MesFatura"];

#[derive(Args, Serialize, Default)]
pub struct ListFilters {
    #[arg(long, help = "Search establishment and labels")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[arg(long, help = "Transaction type (Despesas, Receitas, ...)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grupo: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subgrupo: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estabelecimento: Option<String>,
    #[arg(long, help = "Billing year (YYYY)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[arg(long, help = "Billing month (1-12), requires --year")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    #[command(about = "List transactions")]
    List {
        #[command(flatten)]
        filters: ListFilters,
    },

    #[command(about = "Show one transaction")]
    Show {
        #[arg(help = "Transaction ID")]
        id: i64,
    },

    #[command(about = "Set GRUPO, SUBGRUPO and TipoGasto of a transaction")]
    Classify {
        #[arg(help = "Transaction ID")]
        id: i64,
        #[arg(long)]
        grupo: String,
        #[arg(long)]
        subgrupo: String,
        #[arg(long)]
        tipo_gasto: String,
    },

    #[command(about = "Hide a transaction from the dashboard")]
    Ignore {
        #[arg(help = "Transaction ID")]
        id: i64,
        #[arg(long, help = "Show it on the dashboard again")]
        undo: bool,
    },
}

pub async fn handle(cmd: TransactionCommands, server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = api_client(server)?;

    match cmd {
        TransactionCommands::List { filters } => {
            let rows: Vec<Value> = client.get_query("/api/v1/transactions", &filters).await?;
            output_rows(&output_format, &rows, COLUMNS, "No transactions found")
        }
        TransactionCommands::Show { id } => {
            let row: Value = client.get(&format!("/api/v1/transactions/{}", id)).await?;
            output_object(&output_format, &row)
        }
        TransactionCommands::Classify { id, grupo, subgrupo, tipo_gasto } => {
            let body = json!({ "GRUPO": grupo, "SUBGRUPO": subgrupo, "TipoGasto": tipo_gasto });
            let row: Value = client.put(&format!("/api/v1/transactions/{}", id), &body).await?;
            output_success(&output_format, &format!("Transaction {} classified", id), Some(row))
        }
        TransactionCommands::Ignore { id, undo } => {
            let body = json!({ "IgnorarDashboard": !undo });
            let row: Value = client.patch(&format!("/api/v1/transactions/{}", id), &body).await?;
            let message = if undo {
                format!("Transaction {} shown on dashboard", id)
            } else {
                format!("Transaction {} hidden from dashboard", id)
            };
            output_success(&output_format, &message, Some(row))
        }
    }
}
