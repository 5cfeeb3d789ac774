use std::sync::Arc;

use improcroute::{config::Settings, core::ImageCrateProcessor, service::ImageService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::from_env()?;
    let addr = settings.listen_addr();
    let service = ImageService::new(settings, Arc::new(ImageCrateProcessor))?;

    let handle = service.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received ctrl-c, shutting down");
                handle.shutdown();
            }
            Err(e) => warn!("cannot listen for ctrl-c: {}", e),
        }
    });

    service.start(&addr).await
}
