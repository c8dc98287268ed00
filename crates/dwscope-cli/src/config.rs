//! TOML configuration deserialisation for imaging jobs.

use std::path::Path;

use anyhow::Context;
use dwscope_core::{OpticalSystem, RenderOptions, Sphere};
use serde::Deserialize;

/// Top-level job configuration. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct JobConfig {
    /// Optical train; missing keys take the instrument defaults.
    #[serde(default)]
    pub optics: OpticalSystem,
    #[serde(default)]
    pub particle: ParticleConfig,
    #[serde(default)]
    pub imaging: ImagingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The scatterer.
#[derive(Debug, Deserialize)]
pub struct ParticleConfig {
    /// Radius in µm (default: 0.5).
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Refractive index (default: 1.5).
    #[serde(default = "default_particle_index")]
    pub refractive_index: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            refractive_index: default_particle_index(),
        }
    }
}

fn default_radius() -> f64 {
    0.5
}
fn default_particle_index() -> f64 {
    1.5
}

/// Pipeline switches.
#[derive(Debug, Deserialize)]
pub struct ImagingConfig {
    /// Heights above the focal plane in µm (default: [10.0]).
    #[serde(default = "default_heights")]
    pub heights: Vec<f64>,
    /// Apply the hard exit-pupil aperture (default: false).
    #[serde(default)]
    pub aperture: bool,
    /// Requested image size. Accepted but not applied.
    #[serde(default)]
    pub output_dim: Option<[usize; 2]>,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            heights: default_heights(),
            aperture: false,
            output_dim: None,
        }
    }
}

fn default_heights() -> Vec<f64> {
    vec![10.0]
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to write `render.json` metadata (default: true).
    #[serde(default = "default_true")]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_json: true,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

impl JobConfig {
    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.particle.radius, self.particle.refractive_index)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            aperture: self.imaging.aperture,
            aberration: None,
            output_dim: self.imaging.output_dim,
        }
    }
}

/// Load a TOML job configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<JobConfig> {
    let Some(path) = path else {
        return Ok(JobConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let config: JobConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))?;
    Ok(config)
}
