//! Serve command handler.

use super::startup::build_engine;
use clap::Args;
use std::sync::Arc;
use verse_api::ApiState;
use verse_core::{config::AppConfig, AppResult};

/// Run the HTTP API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Listen address (default from config: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (default from config: 8000)
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let host = self.host.as_deref().unwrap_or(&config.server.host);
        let port = self.port.unwrap_or(config.server.port);

        let engine = Arc::new(build_engine(config).await?);
        if engine.corpora().is_empty() {
            tracing::warn!("Serving without any corpus; /ready will report 503");
        }

        verse_api::serve(ApiState::new(engine), host, port).await
    }
}
