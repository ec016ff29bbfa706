use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

use config::LogFormat;
use services::{
    inventory_service::InventoryService, public_url::PublicUrl, s3_fetcher::S3PageFetcher,
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    // --- Logging setup ---
    let subscriber = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match cfg.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::info!("Starting bucket-inventory with config: {:?}", cfg);

    // --- Storage collaborator ---
    let urls = PublicUrl::new(&cfg.storage.endpoint, &cfg.storage.bucket)?;
    let fetcher = Arc::new(S3PageFetcher::new(&cfg.storage));
    if cfg.production {
        tracing::info!("Production mode: error details are hidden from responses");
    }

    // --- Initialize core service ---
    let inventory = InventoryService::new(fetcher, urls, !cfg.production);

    // --- Build router ---
    let mut app: Router = routes::routes::routes().with_state(inventory);
    if let Some(cors) = routes::routes::cors_layer(&cfg.cors_origins)? {
        tracing::info!("CORS enabled for {:?}", cfg.cors_origins);
        app = app.layer(cors);
    }

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        "Serving inventory of bucket `{}` on http://{}",
        cfg.storage.bucket,
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;

    Ok(())
}
