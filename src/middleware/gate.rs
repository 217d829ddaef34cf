use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::state::AppState;

/// Page gate in front of the frontend routes.
///
/// Protected pages need a session cookie that the identity provider
/// accepts; otherwise the browser is sent to the login page with the
/// original path and query in `redirect`. A signed-in user hitting the
/// login page goes to the default landing page. Provider errors count as
/// "not signed in".
pub async fn page_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let security = &state.config.security;
    let path = request.uri().path();

    let is_login = path == security.login_path;
    if !is_login && !state.config.is_protected_path(path) {
        return next.run(request).await;
    }

    let credentials = Credentials::from_cookie(request.headers(), &security.session_cookie_name);
    let identity = if credentials.is_empty() {
        None
    } else {
        match state.identity.identify(&credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Identity check failed, treating {} as signed out: {}", path, e);
                None
            }
        }
    };

    match (is_login, identity) {
        (true, Some(_)) => Redirect::temporary(&security.default_landing_path).into_response(),
        (true, None) => next.run(request).await,
        (false, Some(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        (false, None) => {
            let original = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| path.to_string());
            debug!("Redirecting unauthenticated request for {} to login", original);
            Redirect::temporary(&login_location(&security.login_path, &original)).into_response()
        }
    }
}

/// `<login_path>?redirect=<urlencoded original>`
pub fn login_location(login_path: &str, original: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", original)
        .finish();
    format!("{}?{}", login_path, query)
}
