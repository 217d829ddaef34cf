use axum::http::{header, HeaderMap};

use crate::config::SecurityConfig;

/// Value of the cookie `name` from the request's Cookie headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub fn session_cookie(security: &SecurityConfig, token: &str, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        security.session_cookie_name, token, max_age_secs
    );
    if security.require_https {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(security: &SecurityConfig) -> String {
    session_cookie(security, "", 0)
}
