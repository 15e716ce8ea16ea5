use log::*;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(err) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize the logger: {err}");
    }

    info!(
        "Starting greeting_sse_rs {} in {} mode",
        env!("CARGO_PKG_VERSION"),
        config.runtime_env()
    );

    let app_state = AppState::new(config);

    if let Err(err) = web::init_server(app_state).await {
        error!("Server stopped with an error: {err}");
        std::process::exit(1);
    }
}
