//! # Borealis Engine
//!
//! Scene composition and animation scheduling for the Borealis night scene.
//!
//! This crate ties the simulation together:
//! - Config: viewport, device class, and effect tunables
//! - Scheduler: named tick callbacks with fault isolation
//! - Scene: snow layers plus ambient effects wired to render targets
//! - Timing: frame pacing for the demo loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod scene;
pub mod scheduler;
pub mod timing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DeviceClass, EngineConfig, Tunables};
    pub use crate::scene::Scene;
    pub use crate::scheduler::{AnimationScheduler, TickCallback};
    pub use crate::timing::{FpsCounter, FrameTiming};
}
