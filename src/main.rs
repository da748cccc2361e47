//! imagepool - image preloading demo
//!
//! Loads the configured batch of images, printing progress as it goes, then
//! reports what ended up in the cache.

mod settings;

use anyhow::{Context, Result};
use imagepool_assets::{ImageManager, LoadStatus};
use imagepool_core::DebugMode;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;

use settings::Settings;

/// Install a stdout subscriber that only lets through what `mode` allows.
fn init_logging(mode: DebugMode) -> Result<()> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(filter_fn(move |meta| mode.allows(meta.level())));
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("Failed to set subscriber")?;
    info!("Debug mode: {}", mode.label());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, origin) = Settings::load();
    init_logging(settings.loader.debug_mode)?;
    origin.report();

    info!("Starting imagepool demo...");

    let manager =
        ImageManager::from_config(&settings.loader).context("Failed to create image manager")?;
    let (done_tx, done_rx) = oneshot::channel();
    let requested = settings.images.len();

    manager
        .load(
            settings.descriptors(),
            move |summary| {
                let _ = done_tx.send(summary);
            },
            |progress| println!("Loading... {:.0}%", progress),
        )
        .context("Failed to submit image batch")?;

    let summary = done_rx
        .await
        .context("Load process ended without reporting completion")?;

    match summary.status {
        LoadStatus::Ok => {
            println!("All {} images loaded", requested);
            manager.with_cache(|cache| {
                for name in cache.names() {
                    if let Some(handle) = cache.get(name) {
                        let tex = handle.texture();
                        println!("  {} ({}): {}x{}", name, handle.source(), tex.width, tex.height);
                    }
                }
            });
        }
        LoadStatus::Fail => {
            println!(
                "{} of {} images failed to load from {}",
                summary.error_count,
                requested,
                settings.loader.base_path.display()
            );
        }
    }

    manager.wait_until_finished().await;
    println!("Global progress: {:.0}%", manager.progress());
    Ok(())
}
