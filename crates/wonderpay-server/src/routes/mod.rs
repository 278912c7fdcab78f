//! Route modules:
//! - capital: loan calculation
//! - health: liveness and readiness probes

pub mod capital;
pub mod health;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// For uptime reporting
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the application router with tracing and, when origins are
/// configured, CORS.
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let cors = cors_layer(&config);
    let state = AppState::new(config);

    let router = Router::new()
        .merge(health::routes())
        .merge(capital::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_serves_all_route_groups() {
        let router = build_router(Arc::new(ServerConfig::default()));

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/capital/calculate")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"loan_amount": 1200, "term_months": 12, "interest_rate": 0}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let router = build_router(Arc::new(ServerConfig::default()));
        let response = router
            .oneshot(Request::builder().uri("/api/capital/offers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_headers_for_configured_origin() {
        let config = ServerConfig {
            cors_origins: vec!["https://app.wonderpay.app".into()],
            ..Default::default()
        };
        let router = build_router(Arc::new(config));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://app.wonderpay.app")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.wonderpay.app"
        );
    }

    #[test]
    fn test_no_cors_layer_without_origins() {
        assert!(cors_layer(&ServerConfig::default()).is_none());
    }
}
