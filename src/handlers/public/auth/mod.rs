// handlers/public/auth/mod.rs - Session acquisition and teardown
//
// In local mode these issue and clear the session cookie themselves.
// In upstream mode the request is forwarded and the upstream's answer,
// including its Set-Cookie, is returned as-is.

pub mod login;  // POST /api/v1/auth/login
pub mod logout; // POST /api/v1/auth/logout

pub use login::login_post;
pub use logout::logout_post;
