pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    endpoint::{EndpointInvoker, HttpEndpointInvoker},
    inference::InferenceHandler,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::info;

/// A configured route and the handler serving it.
pub type Route = (String, Arc<InferenceHandler>);

/// Builds one handler per configured route, all sharing `invoker`.
pub fn build_routes(config: &Config, invoker: Arc<dyn EndpointInvoker>) -> Result<Vec<Route>> {
    let timeout = Duration::from_secs(config.runtime.timeout_secs);
    config
        .handlers
        .iter()
        .map(|handler_config| {
            let handler = InferenceHandler::from_config(handler_config, invoker.clone(), timeout)?;
            Ok((handler_config.path.clone(), Arc::new(handler)))
        })
        .collect()
}

pub fn router(routes: Vec<Route>) -> Router {
    let mut app = Router::new().route("/health", get(handlers::health));

    for (path, handler) in routes {
        info!("Serving {} ({:?}) on POST {}", handler.name(), handler.family(), path);
        app = app.route(&path, post(handlers::inference).with_state(handler));
    }

    app.layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    // One client for the whole process
    let invoker: Arc<dyn EndpointInvoker> = Arc::new(HttpEndpointInvoker::new(&config.runtime)?);
    let app = router(build_routes(&config, invoker)?);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
