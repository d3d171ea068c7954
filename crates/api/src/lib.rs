pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use handlers::*;
pub use middleware::*;
pub use routes::*;
pub use state::*;

use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// Router with every route, state and the middleware stack applied.
pub fn build_app(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_request_body_size_mb as usize * 1024 * 1024;
    with_middleware(build_router(state), max_body_bytes)
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn start_server(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", state.config.server.bind, state.config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("PowerScan API listening on {}", listener.local_addr()?);

    serve(listener, state, shutdown).await?;
    Ok(())
}
