use std::path::Path;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{page_gate, require_identity};
use crate::state::AppState;

/// Full router: public endpoints, the protected API, and gated pages
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .merge(auth_routes())
        .merge(transaction_routes())
        .merge(dashboard_routes())
        .merge(marcacao_routes())
        .merge(category_routes())
        .merge(budget_routes())
        .merge(upload_routes())
        .route("/api/v1/compatibility", get(protected::compatibility::compatibility_get))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_identity));

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(api);

    router = match config.api.static_dir.as_deref() {
        Some(dir) => {
            info!("Serving frontend from {}", dir);
            let index = Path::new(dir).join("index.html");
            let frontend = ServeDir::new(dir).fallback(ServeFile::new(index));
            router.fallback(move |req: Request| frontend_or_not_found(frontend.clone(), req))
        }
        None => router.fallback(not_found),
    };

    let mut router = router
        .layer(middleware::from_fn_with_state(state.clone(), page_gate))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/v1/auth/login", post(auth::login_post))
        .route("/api/v1/auth/logout", post(auth::logout_post))
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new().route("/api/v1/auth/whoami", get(auth::session_whoami))
}

fn transaction_routes() -> Router<AppState> {
    use protected::transactions;

    Router::new()
        .route("/api/v1/transactions", get(transactions::transactions_get))
        .route("/api/v1/transactions/filters", get(transactions::filters_get))
        .route(
            "/api/v1/transactions/:id",
            get(transactions::transaction_get)
                .patch(transactions::transaction_patch)
                .put(transactions::transaction_put),
        )
}

fn dashboard_routes() -> Router<AppState> {
    use protected::dashboard;

    Router::new()
        .route("/api/v1/dashboard/metrics", get(dashboard::metrics_get))
        .route("/api/v1/dashboard/categories", get(dashboard::categories_get))
        .route("/api/v1/dashboard/chart", get(dashboard::chart_get))
        .route("/api/v1/dashboard/budget", get(dashboard::budget_get))
}

fn marcacao_routes() -> Router<AppState> {
    use protected::marcacoes;

    Router::new()
        .route(
            "/api/v1/marcacoes",
            get(marcacoes::marcacoes_get).post(marcacoes::marcacoes_post),
        )
        .route("/api/v1/marcacoes/grupos", get(marcacoes::grupos_get))
        .route("/api/v1/marcacoes/subgrupos", get(marcacoes::subgrupos_get))
        .route(
            "/api/v1/marcacoes/:id",
            axum::routing::put(marcacoes::marcacao_put).delete(marcacoes::marcacao_delete),
        )
}

fn category_routes() -> Router<AppState> {
    use protected::categories;

    Router::new()
        .route(
            "/api/v1/categories",
            get(categories::categories_get).post(categories::categories_post),
        )
        .route(
            "/api/v1/categories/:id",
            axum::routing::put(categories::category_put).delete(categories::category_delete),
        )
}

fn budget_routes() -> Router<AppState> {
    use protected::budget;

    Router::new()
        .route("/api/v1/budget", get(budget::budget_get).put(budget::budget_put))
        .route("/api/v1/budget/:id", axum::routing::delete(budget::budget_delete))
}

fn upload_routes() -> Router<AppState> {
    use protected::upload;

    Router::new()
        .route("/api/v1/upload", any(upload::upload_forward))
        .route("/api/v1/upload/*rest", any(upload::upload_forward))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Unknown API paths keep the JSON 404; everything else goes to the SPA
async fn frontend_or_not_found(frontend: ServeDir<ServeFile>, req: Request) -> Response {
    let path = req.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        return not_found().await.into_response();
    }
    match frontend.oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
