//! Resolution Estimator - Main Entry Point

use api::{init_logging, run_server, Settings};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init_logging(&settings.log_level, settings.log_json)?;

    info!("=== Resolution Estimator v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Pipeline artifact: {}", settings.pipeline_path.display());

    if let Err(e) = run_server(settings).await {
        error!("Startup failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
