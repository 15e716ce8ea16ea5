use axum::http::{header, HeaderValue, Method};
use log::*;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use service::AppState;

mod controller;
mod error;
mod params;
pub mod router;
mod sse;

pub use error::{Error, Result};

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = format!(
        "{}:{}",
        app_state.config.interface(),
        app_state.config.port
    );
    let listener = TcpListener::bind(&server_url).await?;

    info!(
        "Server starting on {server_url}, streaming every {:?} with {} overrun policy",
        app_state.config.stream_interval(),
        app_state.config.overrun_policy
    );

    let cors_layer = cors_layer(&app_state.config.allowed_origins);
    let sse_manager = Arc::clone(&app_state.sse_manager);
    let app = router::define_routes(app_state).layer(cors_layer);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sse_manager))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::ACCEPT, header::CACHE_CONTROL, header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(parse_origins(allowed_origins)))
}

fn parse_origins(allowed_origins: &[String]) -> Vec<HeaderValue> {
    allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Ignoring invalid CORS origin {origin:?}: {err}");
                None
            }
        })
        .collect()
}

// Open event streams never end on their own, so the connection manager has
// to cancel them before axum can finish draining connections.
async fn shutdown_signal(sse_manager: Arc<::sse::Manager>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }

    info!(
        "Closing {} open greeting stream(s)",
        sse_manager.active_connections()
    );
    sse_manager.shutdown();
}
