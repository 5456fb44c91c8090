use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Full application router: public routes, then everything under `/api` behind JWT auth
pub fn app(config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(protected_routes())
        .layer(cors_layer(&config.security.cors_origins));

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn protected_routes() -> Router {
    Router::new()
        .merge(search_routes())
        .merge(account_routes())
        .merge(category_routes())
        .merge(notification_routes())
        .merge(request_routes())
        .layer(from_fn(jwt_auth_middleware))
}

fn search_routes() -> Router {
    use protected::search;

    Router::new().route("/api/search", get(search::search_get).post(search::search_post))
}

fn account_routes() -> Router {
    use protected::account;

    Router::new()
        .route("/api/account/security", get(account::security_get))
        .route(
            "/api/account/security/login-preference",
            put(account::login_preference_put),
        )
}

fn category_routes() -> Router {
    use protected::categories;

    Router::new()
        .route("/api/categories", get(categories::category_list))
        .route("/api/categories/:id", get(categories::category_show))
}

fn notification_routes() -> Router {
    use protected::notifications;

    Router::new()
        .route("/api/notifications", get(notifications::notification_list))
        .route("/api/notifications/unread-count", get(notifications::unread_count))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
}

fn request_routes() -> Router {
    use protected::requests;

    Router::new()
        .route(
            "/api/requests",
            get(requests::request_list).post(requests::request_create),
        )
        .route(
            "/api/requests/:id",
            get(requests::request_show)
                .put(requests::request_update)
                .delete(requests::request_delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
