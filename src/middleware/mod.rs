pub mod auth;
pub mod gate;
pub mod response;

pub use auth::{require_identity, AuthUser};
pub use gate::page_gate;
pub use response::{ApiResponse, ApiResult};
