use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::cli::config::api_client;
use crate::cli::utils::{output_object, output_rows};
use crate::cli::OutputFormat;

#[derive(Args, Serialize)]
pub struct PeriodArgs {
    #[arg(long, help = "Billing year (YYYY)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[arg(long, help = "Billing month (1-12), requires --year")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

#[derive(Subcommand)]
pub enum DashboardCommands {
    #[command(about = "Totals of expenses, income and balance")]
    Metrics {
        #[command(flatten)]
        period: PeriodArgs,
    },

    #[command(about = "Expenses by GRUPO")]
    Categories {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

pub async fn handle(cmd: DashboardCommands, server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = api_client(server)?;

    match cmd {
        DashboardCommands::Metrics { period } => {
            let metrics: Value = client.get_query("/api/v1/dashboard/metrics", &period).await?;
            output_object(&output_format, &metrics)
        }
        DashboardCommands::Categories { period } => {
            let rows: Vec<Value> = client.get_query("/api/v1/dashboard/categories", &period).await?;
            output_rows(
                &output_format,
                &rows,
                &["grupo", "total", "quantidade", "percentual"],
                "No expenses in this period",
            )
        }
    }
}
