//! Borealis entry point.
//!
//! Initializes tracing and runs the fixed-duration headless demo.

#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use borealis_engine::app;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("borealis=info".parse()?))
        .init();

    info!("Borealis starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    app::run()?;

    info!("Borealis shutdown complete");
    Ok(())
}
