use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `journal_entries`. Wire names follow the stored column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: i64,
    #[serde(rename = "Data")]
    pub data: String,
    #[serde(rename = "Estabelecimento")]
    pub estabelecimento: String,
    #[serde(rename = "Valor")]
    pub valor: f64,
    #[serde(rename = "ValorPositivo")]
    pub valor_positivo: f64,
    #[serde(rename = "TipoTransacao")]
    pub tipo_transacao: String,
    #[serde(rename = "GRUPO")]
    pub grupo: Option<String>,
    #[serde(rename = "SUBGRUPO")]
    pub subgrupo: Option<String>,
    #[serde(rename = "TipoGasto")]
    pub tipo_gasto: Option<String>,
    #[serde(rename = "MesFatura")]
    pub mes_fatura: String,
    pub banco: Option<String>,
    #[serde(rename = "IgnorarDashboard")]
    pub ignorar_dashboard: bool,
}

/// Column list matching `JournalEntry` field names
pub(crate) const JOURNAL_ENTRY_COLUMNS: &str = "id, Data AS data, Estabelecimento AS estabelecimento, \
     Valor AS valor, ValorPositivo AS valor_positivo, TipoTransacao AS tipo_transacao, \
     GRUPO AS grupo, SUBGRUPO AS subgrupo, TipoGasto AS tipo_gasto, MesFatura AS mes_fatura, \
     banco, IgnorarDashboard AS ignorar_dashboard";

/// Fields a client may change on an entry. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionUpdate {
    #[serde(rename = "GRUPO", default, skip_serializing_if = "Option::is_none")]
    pub grupo: Option<String>,
    #[serde(rename = "SUBGRUPO", default, skip_serializing_if = "Option::is_none")]
    pub subgrupo: Option<String>,
    #[serde(rename = "TipoGasto", default, skip_serializing_if = "Option::is_none")]
    pub tipo_gasto: Option<String>,
    #[serde(rename = "IgnorarDashboard", default, skip_serializing_if = "Option::is_none")]
    pub ignorar_dashboard: Option<bool>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.grupo.is_none()
            && self.subgrupo.is_none()
            && self.tipo_gasto.is_none()
            && self.ignorar_dashboard.is_none()
    }
}

/// Distinct values used to populate transaction filter selects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub grupos: Vec<String>,
    pub subgrupos: Vec<String>,
    pub estabelecimentos: Vec<String>,
    pub tipos: Vec<String>,
}
