// handlers/public/mod.rs - Handlers reachable without a session
//
// Service info, health and the login/logout pair.

pub mod auth;
pub mod system;

pub use system::{health, root};
