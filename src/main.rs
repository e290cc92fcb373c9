use pylearn_backend::{
    config::init_config, open_result_store, routes::build_router,
    services::catalog_service::QuizCatalog, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pylearn_backend=info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = init_config()?;

    let catalog = QuizCatalog::load(config.quiz_catalog_path.as_deref()).await?;
    let store = open_result_store(config).await?;
    let app_state = AppState::new(config.clone(), catalog, store)?;
    info!(
        "Forwarding code execution to {} ({} {})",
        config.piston_api_url, config.piston_language, config.piston_version
    );

    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
