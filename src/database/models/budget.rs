use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Monthly budget target for a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BudgetMeta {
    pub id: i64,
    #[serde(rename = "MesReferencia")]
    pub mes_referencia: String,
    #[serde(rename = "GRUPO")]
    pub grupo: String,
    #[serde(rename = "Valor")]
    pub valor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewBudgetMeta {
    #[serde(rename = "MesReferencia")]
    pub mes_referencia: String,
    #[serde(rename = "GRUPO")]
    pub grupo: String,
    #[serde(rename = "Valor")]
    pub valor: f64,
}
