//! Headless demo runner.
//!
//! Loads configuration, assembles the scene against no-op surfaces, and
//! drives the scheduler at the target frame rate for a fixed duration,
//! logging frame statistics along the way.

use anyhow::Result;
use borealis_common::NullProvider;
use tracing::info;

use crate::config::EngineConfig;
use crate::scene::Scene;
use crate::timing::{FpsCounter, FrameTiming};

/// Runs the demo loop until the configured duration elapses.
pub fn run() -> Result<()> {
    let mut config = EngineConfig::load();
    config.validate();

    info!(
        width = config.viewport_width,
        height = config.viewport_height,
        device = ?config.device_class,
        fps = config.target_fps,
        duration = config.demo_duration_secs,
        "starting demo"
    );

    let mut scene = Scene::new(&config, &mut NullProvider);
    let mut timing = FrameTiming::new(config.target_fps);
    let mut fps_counter = FpsCounter::new();

    let mut elapsed = 0.0_f32;
    let mut frames = 0_u64;

    loop {
        let dt = timing.delta_time();
        elapsed += dt;
        frames += 1;

        if !scene.tick(dt) {
            info!("scheduler stopped, exiting");
            break;
        }

        if let Some(fps) = fps_counter.tick() {
            info!("FPS: {fps:.1}, wind speed: {:.2}", scene.wind().speed);
        }

        if config.demo_duration_secs > 0.0 && elapsed >= config.demo_duration_secs {
            break;
        }

        timing.sleep_remainder();
    }

    info!(
        "Demo finished: {frames} frames in {elapsed:.1}s ({:.1} FPS average)",
        frames as f32 / elapsed.max(f32::EPSILON)
    );

    Ok(())
}
