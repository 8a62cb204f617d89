mod api;
mod assets;
mod pages;

pub use api::{ApiError, ApiResponse, FailureDetail, HealthStatus, OutputView, ProjectHeader};

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use jobscope_core::config::DashboardSettings;

use crate::client::ApiClient;

/// Dashboard state shared across handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub client: ApiClient,
    pub settings: Arc<DashboardSettings>,
}

impl DashboardState {
    pub fn new(client: ApiClient, settings: DashboardSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }
}

/// Create the router for pages and static assets.
pub fn create_dashboard_router(state: DashboardState) -> Router {
    Router::new()
        // Dashboard pages
        .route("/", get(pages::index))
        .route("/projects", get(pages::default_project))
        .route("/projects/{project}", get(pages::project_overview))
        .route("/projects/{project}/failures", get(pages::failures))
        // Static assets
        .route("/assets/styles.css", get(assets::styles_css))
        .route("/assets/main.js", get(assets::main_js))
        .route("/assets/plot.js", get(assets::plot_js))
        .with_state(state)
}

/// Create the JSON API router, mounted under `/api`.
pub fn create_api_router(state: DashboardState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Projects API
        .route("/projects", get(api::list_projects))
        .route("/projects/{project}", get(api::get_project))
        // Overview API
        .route("/chart", get(api::get_chart))
        .route("/jobs", get(api::list_jobs))
        .route("/output", get(api::get_output))
        // Failures API
        .route("/projects/{project}/failures", get(api::list_failures))
        .route("/projects/{project}/failures/{row}", get(api::get_failure))
        .route(
            "/projects/{project}/jobs/{job_id}/output",
            get(api::get_job_output),
        )
        .fallback(api::not_found)
        .layer(cors)
        .with_state(state)
}

/// Pages, assets, the JSON API and the health check in one router.
pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .merge(create_dashboard_router(state.clone()))
        .nest("/api", create_api_router(state))
        .route("/health", get(api::health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use jobscope_core::config::UpstreamConfig;
    use tower::ServiceExt;

    fn router() -> Router {
        let client = ApiClient::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();
        create_router(DashboardState::new(client, DashboardSettings::default()))
    }

    async fn get(uri: &str) -> axum::response::Response {
        router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_assets_content_types() {
        for (uri, content_type) in [
            ("/assets/styles.css", "text/css"),
            ("/assets/main.js", "application/javascript"),
            ("/assets/plot.js", "application/javascript"),
        ] {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
        }
    }

    #[tokio::test]
    async fn test_api_is_nested() {
        // Nothing listens on the upstream port.
        let response = get("/api/projects").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get("/nope").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_api_route_is_json() {
        let response = get("/api/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
    }
}
