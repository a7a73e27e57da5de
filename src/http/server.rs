//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router: configured delegate routes first, everything
//!   else through the dispatcher middleware
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::dispatch::{dispatch_middleware, Dispatcher};
use crate::lifecycle::Shutdown;
use crate::registry::ControllerRegistry;

/// HTTP server hosting the dispatcher.
pub struct HttpServer {
    router: Router,
    dispatcher: Dispatcher,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and controllers.
    pub fn new(config: Arc<AppConfig>, registry: ControllerRegistry) -> Self {
        let dispatcher = Dispatcher::new(config, registry);
        let router = Self::build_router(&dispatcher);
        Self { router, dispatcher }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(dispatcher: &Dispatcher) -> Router {
        let config = dispatcher.config();
        let mut router = Router::new();

        for delegate in &config.delegates {
            match dispatcher.delegate(&delegate.controller, &delegate.action) {
                Ok(handler) => {
                    tracing::info!(
                        path = %delegate.path,
                        controller = %delegate.controller,
                        action = %delegate.action,
                        "Delegate route mounted"
                    );
                    router = router.route(&delegate.path, any(handler.into_handler()));
                }
                Err(e) => {
                    tracing::warn!(path = %delegate.path, error = %e, "Skipping delegate route");
                }
            }
        }

        let dispatched = Router::new()
            .fallback(not_found)
            .layer(middleware::from_fn_with_state(
                dispatcher.clone(),
                dispatch_middleware,
            ));

        router
            .fallback_service(dispatched)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve connections from `listener` until `shutdown` is triggered, then
    /// let in-flight requests finish.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            controllers = ?self.dispatcher.registry().names(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.signalled().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Final handler for requests no controller action claimed.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
