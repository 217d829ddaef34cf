use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CompatibilityRecord {
    pub bank_name: String,
    pub file_format: String,
    pub status: String,
}

/// bank -> format -> status
pub type CompatibilityMatrix = BTreeMap<String, BTreeMap<String, String>>;

impl CompatibilityRecord {
    /// Reshape flat rows into the nested bank/format mapping.
    /// A later row for the same (bank, format) wins.
    pub fn nest(records: Vec<CompatibilityRecord>) -> CompatibilityMatrix {
        let mut matrix = CompatibilityMatrix::new();
        for r in records {
            matrix
                .entry(r.bank_name)
                .or_default()
                .insert(r.file_format, r.status);
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(bank: &str, format: &str, status: &str) -> CompatibilityRecord {
        CompatibilityRecord {
            bank_name: bank.into(),
            file_format: format.into(),
            status: status.into(),
        }
    }

    #[test]
    fn nest_groups_by_bank_then_format() {
        let matrix = CompatibilityRecord::nest(vec![
            rec("Itaú", "csv", "OK"),
            rec("Itaú", "pdf", "WIP"),
            rec("BTG", "xls", "OK"),
        ]);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix["Itaú"]["pdf"], "WIP");
        assert_eq!(matrix["BTG"]["xls"], "OK");
    }

    #[test]
    fn nest_empty() {
        assert!(CompatibilityRecord::nest(vec![]).is_empty());
    }
}
