use anyhow::Result;
use tracing::{error, info, warn};

use azlive::config::load_config;
use azlive::logging::init_logging;
use azlive::session::run_session;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_logging(&config.logging)?;

    for field in config.azure.missing_required() {
        warn!(field, "required setting is empty; authentication will fail");
    }

    match run_session(&config).await {
        Ok(handles) => {
            info!(
                ingest_url = handles.ingest_url.as_deref().unwrap_or("-"),
                preview_endpoint = handles.preview_endpoint.as_deref().unwrap_or("-"),
                streaming_endpoint = handles.streaming_endpoint.as_deref().unwrap_or("-"),
                hls_manifest = %handles.hls_manifest,
                dash_manifest = %handles.dash_manifest,
                "live session run complete"
            );
        }
        // logged, not re-thrown: the process still exits cleanly
        Err(err) => error!(error = %err, "live session run failed"),
    }

    Ok(())
}
