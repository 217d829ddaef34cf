pub mod auth;
pub mod compat;
pub mod dashboard;
pub mod marcacoes;
pub mod transactions;
pub mod user;
