use finsite_service::config::FinsiteConfig;
use finsite_service::services::init_metrics;
use finsite_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // Fail fast on missing production keys.
    let config = FinsiteConfig::load()?;

    init_tracing(
        "finsite-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics().map_err(AppError::InternalError)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.common.port,
        "Starting finsite-service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
