//! Engine configuration.
//!
//! Viewport dimensions, device class, and effect tunables, loadable from a
//! TOML file. Missing or malformed files fall back to defaults so the scene
//! always starts. Device-class-dependent tunables (particle counts, spawn
//! intervals) resolve through [`EngineConfig::tunables`]; explicit values in
//! the file override the class defaults.

use borealis_sim::profile::{validate_depth_ordering, LayerProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "borealis.toml";

/// Coarse device class selecting a tunable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Full particle counts and short spawn intervals
    #[default]
    Desktop,
    /// Reduced particle counts and longer spawn intervals
    Mobile,
}

/// Resolved device-class tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    /// Total flakes across all six snow layers
    pub layer_flake_total: usize,
    /// Flakes in the ambient (non-accumulating) snowfall
    pub ambient_flake_count: usize,
    /// Star-count scale for the star field
    pub star_density_scale: f32,
    /// Seconds between shooting-star spawns
    pub shooting_star_interval: f32,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Device class selecting tunable defaults
    pub device_class: DeviceClass,
    /// Target frames per second for the demo loop
    pub target_fps: u32,
    /// Seconds between wind resamples
    pub wind_shift_interval: f32,
    /// Demo run duration in seconds (0 = forever)
    pub demo_duration_secs: f32,
    /// RNG seed (None = random per run)
    pub seed: Option<u64>,

    /// Override for [`Tunables::layer_flake_total`]
    pub layer_flake_total: Option<usize>,
    /// Override for [`Tunables::ambient_flake_count`]
    pub ambient_flake_count: Option<usize>,
    /// Override for [`Tunables::star_density_scale`]
    pub star_density_scale: Option<f32>,
    /// Override for [`Tunables::shooting_star_interval`]
    pub shooting_star_interval: Option<f32>,

    /// Replacement snow-layer profile table (builtin six-layer table if
    /// absent)
    pub profiles: Option<Vec<LayerProfile>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            device_class: DeviceClass::Desktop,
            target_fps: 60,
            wind_shift_interval: 12.0,
            demo_duration_secs: 10.0,
            seed: None,
            layer_flake_total: None,
            ambient_flake_count: None,
            star_density_scale: None,
            shooting_star_interval: None,
            profiles: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `borealis.toml` in the working directory.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Saves configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validates and clamps configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.viewport_width = self.viewport_width.clamp(320, 7680);
        self.viewport_height = self.viewport_height.clamp(240, 4320);
        self.target_fps = self.target_fps.clamp(30, 240);
        self.wind_shift_interval = self.wind_shift_interval.clamp(1.0, 120.0);
        self.demo_duration_secs = self.demo_duration_secs.clamp(0.0, 3600.0);

        if let Some(count) = &mut self.layer_flake_total {
            *count = (*count).clamp(6, 3000);
        }
        if let Some(count) = &mut self.ambient_flake_count {
            *count = (*count).min(2000);
        }
        if let Some(scale) = &mut self.star_density_scale {
            *scale = scale.clamp(0.0, 4.0);
        }
        if let Some(interval) = &mut self.shooting_star_interval {
            *interval = interval.clamp(0.5, 120.0);
        }

        if let Some(profiles) = &self.profiles {
            let ok = !profiles.is_empty()
                && profiles.iter().all(LayerProfile::is_well_formed)
                && validate_depth_ordering(profiles);
            if !ok {
                warn!("Rejecting malformed profile table, using builtin layers");
                self.profiles = None;
            }
        }
    }

    /// The snow-layer profile table: the configured replacement if present,
    /// the builtin six-layer table otherwise.
    #[must_use]
    pub fn layer_profiles(&self) -> Vec<LayerProfile> {
        self.profiles.clone().unwrap_or_else(LayerProfile::builtin)
    }

    /// Resolves the effective tunables for the configured device class,
    /// applying any explicit overrides.
    #[must_use]
    pub fn tunables(&self) -> Tunables {
        let defaults = match self.device_class {
            DeviceClass::Desktop => Tunables {
                layer_flake_total: 500,
                ambient_flake_count: 150,
                star_density_scale: 1.0,
                shooting_star_interval: 6.0,
            },
            DeviceClass::Mobile => Tunables {
                layer_flake_total: 250,
                ambient_flake_count: 40,
                star_density_scale: 0.6,
                shooting_star_interval: 10.0,
            },
        };

        Tunables {
            layer_flake_total: self.layer_flake_total.unwrap_or(defaults.layer_flake_total),
            ambient_flake_count: self
                .ambient_flake_count
                .unwrap_or(defaults.ambient_flake_count),
            star_density_scale: self
                .star_density_scale
                .unwrap_or(defaults.star_density_scale),
            shooting_star_interval: self
                .shooting_star_interval
                .unwrap_or(defaults.shooting_star_interval),
        }
    }
}
