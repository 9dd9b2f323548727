//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, limits, rate limiting)
//! - Bind server to listener and drain on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::external::{ExternalDataError, ExternalDataService};
use crate::health::HealthProbe;
use crate::http::doc::{ApiDoc, DOCUMENTATION_PATH, OPENAPI_PATH};
use crate::http::external_data::external_data;
use crate::http::health::{health, health_detailed};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::not_found;
use crate::http::unique_array::unique_array;
use crate::observability::metrics;
use crate::security::{rate_limit_middleware, RateLimiterState};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExternalDataService>,
    pub probe: Arc<HealthProbe>,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Upstream(#[from] ExternalDataError),
}

/// HTTP server for the backend.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Build the upstream clients and the router.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("backend-challenge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let service = Arc::new(ExternalDataService::from_config(http, &config.upstream)?);
        let probe = Arc::new(HealthProbe::new(
            service.clone(),
            config.upstream.probe_timeout(),
        ));

        let state = AppState { service, probe };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(root))
            .route("/unique-array", post(unique_array))
            .route("/external-data", get(external_data))
            .route("/health", get(health))
            .route("/health/detailed", get(health_detailed))
            .route_layer(middleware::from_fn(metrics::track_metrics))
            .fallback(not_found)
            .with_state(state)
            .merge(SwaggerUi::new(DOCUMENTATION_PATH).url(OPENAPI_PATH, ApiDoc::openapi()));

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = self.config.rate_limit.enabled,
            documentation = DOCUMENTATION_PATH,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Greeting {
    #[schema(value_type = String, example = "world")]
    pub hello: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = Greeting)),
    tags = ["root"],
    operation_id = "root"
)]
pub async fn root() -> Json<Greeting> {
    Json(Greeting { hello: "world" })
}
