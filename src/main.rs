use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info};

use classroom::classroom_config::ServerConfig;
use classroom::classroom_db::run_migrations;
use classroom::logging::{init_tracing, shutdown_tracer};
use classroom::metrics::{init_metrics, metrics_app};
use classroom::router::init_router;
use classroom::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config)?;

    let metrics_handle = init_metrics().context("Failed to install Prometheus recorder")?;

    let state = init_app_state(server_config.clone()).await?;
    run_migrations(&state.db)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    println!("🚀 Server running on http://{}", address);
    println!("📚 Swagger UI available at http://{}/swagger-ui", address);
    println!("📖 Scalar UI available at http://{}/scalar", address);
    println!("❤️  Health check at http://{}/health/", address);

    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    shutdown_tracer();
    result.context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
