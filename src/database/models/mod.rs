pub mod budget;
pub mod category;
pub mod compatibility;
pub mod journal_entry;
pub mod marcacao;
pub mod user;

pub use budget::{BudgetMeta, NewBudgetMeta};
pub use category::{Category, NewCategory};
pub use compatibility::{CompatibilityMatrix, CompatibilityRecord};
pub use journal_entry::{FilterOptions, JournalEntry, TransactionUpdate};
pub use marcacao::{Marcacao, NewMarcacao};
pub use user::User;
