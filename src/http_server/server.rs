//! # HTTP Server
//!
//! Builds the shared store and live feed, wires every router together and
//! serves them.

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::feed::LiveFeed;
use crate::telemetry::StateStore;

use super::auth::ApiKeyAuth;
use super::config::ServerConfig;
use super::data_routes::{data_routes, DataState};
use super::errors::ApiError;
use super::observability_routes::{debug_routes, health_routes, DebugState};
use super::stream_routes::stream_routes;

/// HTTP server for telemetry ingestion and the live feed
pub struct HttpServer {
    config: ServerConfig,
    store: Arc<StateStore>,
    feed: LiveFeed,
    auth: ApiKeyAuth,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let store = Arc::new(StateStore::new(config.history_capacity));
        let feed = LiveFeed::new(store.clone(), config.stream_interval());
        let auth = ApiKeyAuth::new(config.api_key.clone());
        let router = Self::build_router(&config, store.clone(), feed.clone(), auth.clone());
        Self {
            config,
            store,
            feed,
            auth,
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &ServerConfig,
        store: Arc<StateStore>,
        feed: LiveFeed,
        auth: ApiKeyAuth,
    ) -> Router {
        let data_state = Arc::new(DataState::new(store.clone(), auth));
        let debug_state = Arc::new(DebugState {
            public_dir: config.public_dir.clone(),
            store,
            feed: feed.clone(),
        });

        let routes = Router::new()
            .merge(health_routes())
            .merge(data_routes(data_state))
            .merge(stream_routes(feed))
            .merge(debug_routes(debug_state))
            // Landing page and other static assets
            .fallback_service(ServeDir::new(&config.public_dir));

        Self::with_middleware(routes, config)
    }

    /// Wrap `routes` in the server's middleware stack: panic recovery,
    /// request tracing and CORS.
    pub fn with_middleware(routes: Router, config: &ServerConfig) -> Router {
        routes
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .layer(Self::cors_layer(config))
    }

    fn cors_layer(config: &ServerConfig) -> CorsLayer {
        if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin)
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Shared state store
    pub fn store(&self) -> Arc<StateStore> {
        self.store.clone()
    }

    /// Live feed handle
    pub fn feed(&self) -> LiveFeed {
        self.feed.clone()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server. Runs until the process is terminated.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(%addr, "telemetry API listening");
        if !self.auth.is_configured() {
            warn!("API_KEY is not set; every POST /data will be rejected");
        }

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a handler panic into a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(detail).into_response()
}
