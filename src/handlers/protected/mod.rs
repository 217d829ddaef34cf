// handlers/protected/mod.rs - Handlers behind the identity check
//
// Every route here runs after `require_identity`, which puts the caller's
// `AuthUser` into the request extensions or answers 401.

pub mod auth;
pub mod budget;
pub mod categories;
pub mod compatibility;
pub mod dashboard;
pub mod marcacoes;
pub mod transactions;
pub mod upload;
