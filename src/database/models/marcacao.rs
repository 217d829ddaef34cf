use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Classification triple from `base_marcacoes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Marcacao {
    pub id: i64,
    #[serde(rename = "GRUPO")]
    pub grupo: String,
    #[serde(rename = "SUBGRUPO")]
    pub subgrupo: String,
    #[serde(rename = "TipoGasto")]
    pub tipo_gasto: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMarcacao {
    #[serde(rename = "GRUPO")]
    pub grupo: String,
    #[serde(rename = "SUBGRUPO")]
    pub subgrupo: String,
    #[serde(rename = "TipoGasto")]
    pub tipo_gasto: String,
}

impl NewMarcacao {
    /// Trimmed copy; returns the names of blank fields when any
    pub fn normalized(&self) -> Result<Self, Vec<&'static str>> {
        let grupo = self.grupo.trim();
        let subgrupo = self.subgrupo.trim();
        let tipo_gasto = self.tipo_gasto.trim();

        let missing: Vec<&'static str> = [("GRUPO", grupo), ("SUBGRUPO", subgrupo), ("TipoGasto", tipo_gasto)]
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| *k)
            .collect();

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Self {
            grupo: grupo.to_string(),
            subgrupo: subgrupo.to_string(),
            tipo_gasto: tipo_gasto.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_and_reports_blanks() {
        let m = NewMarcacao {
            grupo: "  Casa ".into(),
            subgrupo: "Aluguel".into(),
            tipo_gasto: " Moradia".into(),
        };
        assert_eq!(m.normalized().unwrap().grupo, "Casa");

        let blank = NewMarcacao {
            grupo: "Casa".into(),
            subgrupo: "  ".into(),
            tipo_gasto: "".into(),
        };
        assert_eq!(blank.normalized().unwrap_err(), vec!["SUBGRUPO", "TipoGasto"]);
    }
}
