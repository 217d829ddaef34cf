//! Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of a journal entry, stored verbatim in `TipoTransacao`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Despesas")]
    Expense,
    #[serde(rename = "Cartão de Crédito")]
    CreditCard,
    #[serde(rename = "Receitas")]
    Income,
    #[serde(rename = "Transferências")]
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Expense,
        TransactionType::CreditCard,
        TransactionType::Income,
        TransactionType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Despesas",
            TransactionType::CreditCard => "Cartão de Crédito",
            TransactionType::Income => "Receitas",
            TransactionType::Transfer => "Transferências",
        }
    }

    /// Types that count as spending on the dashboard
    pub fn is_spending(&self) -> bool {
        matches!(self, TransactionType::Expense | TransactionType::CreditCard)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the stored labels and short aliases used by query strings
        match s.trim().to_lowercase().as_str() {
            "despesas" | "despesa" | "expense" => Ok(TransactionType::Expense),
            "cartão de crédito" | "cartao de credito" | "cartao" | "credit_card" => Ok(TransactionType::CreditCard),
            "receitas" | "receita" | "income" => Ok(TransactionType::Income),
            "transferências" | "transferencias" | "transferencia" | "transfer" => Ok(TransactionType::Transfer),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("year must be a 4-digit number, got '{0}'")]
    InvalidYear(String),

    #[error("month must be a number between 1 and 12, got '{0}'")]
    InvalidMonth(String),

    #[error("month requires year")]
    MonthWithoutYear,

    #[error("billing month must be in YYYYMM form, got '{0}'")]
    InvalidMesFatura(String),
}

/// Reporting window over `MesFatura`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    /// `YYYY`
    Year(String),
    /// `YYYYMM`
    Month(String),
}

impl Period {
    /// Build a period from raw `year`/`month` query values.
    /// Empty strings count as absent.
    pub fn from_query(year: Option<&str>, month: Option<&str>) -> Result<Self, PeriodError> {
        let year = year.map(str::trim).filter(|s| !s.is_empty());
        let month = month.map(str::trim).filter(|s| !s.is_empty());

        match (year, month) {
            (None, None) => Ok(Period::All),
            (None, Some(_)) => Err(PeriodError::MonthWithoutYear),
            (Some(y), m) => {
                let y = parse_year(y)?;
                match m {
                    None => Ok(Period::Year(y)),
                    Some(m) => Ok(Period::Month(format!("{}{:02}", y, parse_month(m)?))),
                }
            }
        }
    }

    /// Parse an already-assembled `YYYYMM` key
    pub fn from_mes_fatura(value: &str) -> Result<Self, PeriodError> {
        let value = value.trim();
        if value.len() != 6 || !value.is_ascii() {
            return Err(PeriodError::InvalidMesFatura(value.to_string()));
        }
        let (y, m) = value.split_at(4);
        let y = parse_year(y).map_err(|_| PeriodError::InvalidMesFatura(value.to_string()))?;
        let m = parse_month(m).map_err(|_| PeriodError::InvalidMesFatura(value.to_string()))?;
        Ok(Period::Month(format!("{}{:02}", y, m)))
    }

    pub fn mes_fatura(&self) -> Option<&str> {
        match self {
            Period::Month(m) => Some(m),
            _ => None,
        }
    }
}

fn parse_year(raw: &str) -> Result<String, PeriodError> {
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(PeriodError::InvalidYear(raw.to_string()))
    }
}

fn parse_month(raw: &str) -> Result<u32, PeriodError> {
    if raw.is_empty() || raw.len() > 2 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(PeriodError::InvalidMonth(raw.to_string()));
    }
    match raw.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(m),
        _ => Err(PeriodError::InvalidMonth(raw.to_string())),
    }
}

/// Fixed palette for dashboard groups; unknown groups get a neutral color
pub fn group_color(grupo: &str) -> &'static str {
    match grupo.trim().to_lowercase().as_str() {
        "casa" | "moradia" => "#3B82F6",
        "alimentação" | "alimentacao" => "#F97316",
        "saúde" | "saude" => "#EF4444",
        "transporte" | "carro" => "#8B5CF6",
        "lazer" | "entretenimento" => "#EC4899",
        "educação" | "educacao" => "#14B8A6",
        "viagens" | "viagem" => "#06B6D4",
        "roupas" | "vestuário" | "vestuario" => "#F59E0B",
        "assinaturas" => "#6366F1",
        "investimentos" => "#10B981",
        "salário" | "salario" => "#22C55E",
        "impostos" | "taxas" => "#64748B",
        _ => "#9CA3AF",
    }
}
