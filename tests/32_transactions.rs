mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{authed_client, json_of, SeedEntry, TestServer};

async fn seeded() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server
        .seed_entry(SeedEntry::expense("Padaria Pão Quente", 32.5, "202503").grupo("Alimentação", "Padaria"))
        .await?;
    server
        .seed_entry(SeedEntry::expense("Posto Ipiranga", 200.0, "202503").grupo("Transporte", "Combustível"))
        .await?;
    server
        .seed_entry(SeedEntry::income("Salário ACME", 5000.0, "202503").grupo("Salário", "Mensal"))
        .await?;
    server
        .seed_entry(SeedEntry::expense("Padaria Central", 18.0, "202504").grupo("Alimentação", "Padaria"))
        .await?;
    server
        .seed_entry(SeedEntry::expense("Livraria", 80.0, "202412"))
        .await?;
    Ok(server)
}

async fn list(server: &TestServer, query: &str) -> Result<(StatusCode, Value)> {
    let http = authed_client(&server.token()?);
    json_of(
        http.get(server.url(&format!("/api/v1/transactions{}", query)))
            .send()
            .await?,
    )
    .await
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r["Estabelecimento"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn lists_everything_without_filters() -> Result<()> {
    let server = seeded().await?;

    let (status, body) = list(&server, "").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 5);
    Ok(())
}

#[tokio::test]
async fn filters_by_year_and_month() -> Result<()> {
    let server = seeded().await?;

    let (_, body) = list(&server, "?year=2025&month=3").await?;
    assert_eq!(names(&body).len(), 3);
    assert!(body["data"].as_array().expect("array").iter().all(|r| r["MesFatura"] == "202503"));

    let (_, body) = list(&server, "?year=2025").await?;
    assert_eq!(names(&body).len(), 4);

    let (_, body) = list(&server, "?year=2024&month=12").await?;
    assert_eq!(names(&body), vec!["Livraria".to_string()]);
    Ok(())
}

#[tokio::test]
async fn filters_by_search_and_type() -> Result<()> {
    let server = seeded().await?;

    let (_, body) = list(&server, "?search=padaria").await?;
    let mut found = names(&body);
    found.sort();
    assert_eq!(found, vec!["Padaria Central".to_string(), "Padaria Pão Quente".to_string()]);

    let (_, body) = list(&server, "?tipo=Receitas").await?;
    assert_eq!(names(&body), vec!["Salário ACME".to_string()]);

    let (_, body) = list(&server, "?grupo=Transporte").await?;
    assert_eq!(names(&body), vec!["Posto Ipiranga".to_string()]);
    Ok(())
}

#[tokio::test]
async fn search_wildcards_are_literal() -> Result<()> {
    let server = seeded().await?;

    let (status, body) = list(&server, "?search=%25").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn limit_and_offset_page_results() -> Result<()> {
    let server = seeded().await?;

    let (_, first) = list(&server, "?limit=2").await?;
    let (_, second) = list(&server, "?limit=2&offset=2").await?;
    assert_eq!(names(&first).len(), 2);
    assert_eq!(names(&second).len(), 2);
    assert!(names(&first).iter().all(|n| !names(&second).contains(n)));

    let (status, _) = list(&server, "?limit=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = list(&server, "?offset=-1").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_period_values_are_rejected() -> Result<()> {
    let server = seeded().await?;

    let (status, body) = list(&server, "?year=2025%27%20OR%20%271%27%3D%271").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = list(&server, "?year=2025&month=13").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = list(&server, "?month=03").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "month requires year");

    let (status, _) = list(&server, "?tipo=Salary").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Table survived
    assert_eq!(server.count("journal_entries").await?, 5);
    Ok(())
}

#[tokio::test]
async fn get_by_id_and_404() -> Result<()> {
    let server = seeded().await?;
    let http = authed_client(&server.token()?);
    let id = server
        .seed_entry(SeedEntry::expense("Farmácia", 45.9, "202503"))
        .await?;

    let (status, body) = json_of(
        http.get(server.url(&format!("/api/v1/transactions/{}", id)))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Estabelecimento"], "Farmácia");
    assert_eq!(body["data"]["Valor"], -45.9);
    assert_eq!(body["data"]["ValorPositivo"], 45.9);
    assert_eq!(body["data"]["IgnorarDashboard"], false);

    let (status, body) = json_of(http.get(server.url("/api/v1/transactions/9999")).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transaction 9999 not found");
    Ok(())
}

#[tokio::test]
async fn patch_updates_only_given_fields() -> Result<()> {
    let server = TestServer::spawn().await?;
    let http = authed_client(&server.token()?);
    let id = server
        .seed_entry(SeedEntry::expense("Uber", 25.0, "202503").grupo("Transporte", "App"))
        .await?;
    let url = server.url(&format!("/api/v1/transactions/{}", id));

    let (status, body) = json_of(http.patch(&url).json(&json!({ "IgnorarDashboard": true })).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["IgnorarDashboard"], true);
    assert_eq!(body["data"]["GRUPO"], "Transporte");

    let (status, body) = json_of(http.patch(&url).json(&json!({ "TipoGasto": "Variável" })).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["TipoGasto"], "Variável");
    assert_eq!(body["data"]["IgnorarDashboard"], true);
    Ok(())
}

#[tokio::test]
async fn patch_rejects_empty_unknown_and_blank() -> Result<()> {
    let server = TestServer::spawn().await?;
    let http = authed_client(&server.token()?);
    let id = server.seed_entry(SeedEntry::expense("Uber", 25.0, "202503")).await?;
    let url = server.url(&format!("/api/v1/transactions/{}", id));

    let (status, _) = json_of(http.patch(&url).json(&json!({})).send().await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = json_of(http.patch(&url).json(&json!({ "Valor": 0 })).send().await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = json_of(http.patch(&url).json(&json!({ "GRUPO": "  " })).send().await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = json_of(
        http.patch(server.url("/api/v1/transactions/9999"))
            .json(&json!({ "IgnorarDashboard": true }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn put_reclassifies_with_full_triple() -> Result<()> {
    let server = TestServer::spawn().await?;
    let http = authed_client(&server.token()?);
    let id = server.seed_entry(SeedEntry::expense("Netflix", 55.9, "202503")).await?;
    let url = server.url(&format!("/api/v1/transactions/{}", id));

    let (status, body) = json_of(
        http.put(&url)
            .json(&json!({ "GRUPO": "Lazer", "SUBGRUPO": "Streaming", "TipoGasto": "Fixo" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["GRUPO"], "Lazer");
    assert_eq!(body["data"]["SUBGRUPO"], "Streaming");
    assert_eq!(body["data"]["TipoGasto"], "Fixo");

    let (status, _) = json_of(http.put(&url).json(&json!({ "GRUPO": "Lazer" })).send().await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn filter_options_follow_the_period() -> Result<()> {
    let server = seeded().await?;
    let http = authed_client(&server.token()?);

    let (status, body) = json_of(
        http.get(server.url("/api/v1/transactions/filters?year=2025&month=03"))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["grupos"], json!(["Alimentação", "Salário", "Transporte"]));
    assert_eq!(body["data"]["tipos"], json!(["Despesas", "Receitas"]));
    assert_eq!(body["data"]["estabelecimentos"].as_array().map(Vec::len), Some(3));
    Ok(())
}
