pub mod api; // Browser UI + JSON/SSE endpoints
pub mod config;
pub mod inference; // Chat-completion client boundary
pub mod pipeline; // note → explanation → translation → PDFs
pub mod report; // Templates, block composition, PDF rendering
pub mod sanitize;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::inference::{InferenceError, OpenAiClient};
use crate::pipeline::ReportPipeline;
use crate::report::DirectoryFontProvider;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inference client error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Server error: {0}")]
    Server(String),
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Resolve configuration, start the server, and run until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(
        model = %config.model,
        base_url = %config.base_url,
        fonts_dir = %config.fonts_dir.display(),
        "Configuration loaded"
    );

    // The blocking client must not be built on an async worker thread.
    let client_config = config.clone();
    let client = tokio::task::spawn_blocking(move || OpenAiClient::from_config(&client_config))
        .await
        .map_err(|e| StartupError::Server(format!("client setup task failed: {e}")))??;

    let fonts = DirectoryFontProvider::new(&config.fonts_dir);
    let missing = fonts.missing_faces();
    if !missing.is_empty() {
        tracing::warn!(
            dir = %fonts.dir().display(),
            missing = ?missing,
            "Font files missing; English falls back to Helvetica, Korean reports will fail"
        );
    }

    let mut pipeline = ReportPipeline::new(Arc::new(client), Arc::new(fonts));
    if let Some(dir) = &config.export_dir {
        tracing::info!(dir = %dir.display(), "PDF export enabled");
        pipeline = pipeline.with_export_dir(dir);
    }

    let mut server = api::start_server(api::ApiContext::new(pipeline), config.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!("Open http://{} in a browser", server.addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.stopped().await;
    Ok(())
}
