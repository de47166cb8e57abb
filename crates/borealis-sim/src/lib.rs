//! # Borealis Sim
//!
//! The simulation core for the Borealis night scene:
//! - Layer profiles for the six parallax snowfall planes
//! - Snowflake particles with in-place recycling
//! - The segmented snow-pile height field particles deposit onto
//! - Wind state shared across layers
//! - Ambient effects (simple snow, star field, shooting stars, moon phase)
//!
//! All simulation is single-threaded and advanced one explicit tick at a
//! time; drawing goes through the `Surface` contract in `borealis-common`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ambient;
pub mod heightfield;
pub mod layer;
pub mod particle;
pub mod profile;
pub mod wind;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ambient::*;
    pub use crate::heightfield::*;
    pub use crate::layer::*;
    pub use crate::particle::*;
    pub use crate::profile::*;
    pub use crate::wind::*;
}

pub use prelude::*;
