use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::cli::config::api_client;
use crate::cli::utils::output_rows;
use crate::cli::OutputFormat;

pub async fn handle(server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = api_client(server)?;
    let matrix: BTreeMap<String, BTreeMap<String, String>> = client.get("/api/v1/compatibility").await?;

    let rows: Vec<Value> = matrix
        .iter()
        .flat_map(|(bank, formats)| {
            formats
                .iter()
                .map(move |(format, status)| json!({ "bank": bank, "format": format, "status": status }))
        })
        .collect();

    output_rows(&output_format, &rows, &["bank", "format", "status"], "No compatibility data")
}
