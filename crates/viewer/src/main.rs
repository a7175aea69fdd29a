//! Interactive camera demo: a winit window with a CPU framebuffer that pans,
//! zooms and hit-tests a world-space marker lattice through the `camera`
//! crate, once per drawable per frame.
//!
//! Controls: WASD / arrows pan, mouse wheel or +/- zooms, left click logs the
//! world position under the cursor, F1 toggles per-frame view-state logging,
//! Escape quits.

mod config;
mod draw;
mod loop_runner;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    info!("=== Camera Viewer Startup ===");

    let config = match config::load_config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "config_invalid");
            std::process::exit(1);
        }
    };

    if let Err(err) = loop_runner::run_viewer(config) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
