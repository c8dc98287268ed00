//! Job runner: renders camera images and writes them to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Serialize;

use dwscope_core::{
    discretize_plan, focal_plane_hologram, render_batch, render_camera_image_with,
    DiscretizationPlan, OpticalSystem, Sphere,
};

use crate::config::JobConfig;

/// One rendered camera image.
pub struct RenderedImage {
    /// Height above the focal plane (µm).
    pub height_um: f64,
    pub image: Array2<f64>,
}

/// Metadata written next to the images as `render.json`.
#[derive(Debug, Serialize)]
pub struct RenderMetadata {
    pub version: &'static str,
    pub optics: OpticalSystem,
    pub particle: Sphere,
    pub plan: DiscretizationPlan,
    /// Camera sampling referred to the object plane (µm/pixel).
    pub effective_pitch: f64,
    pub aperture: bool,
    pub heights_um: Vec<f64>,
    pub files: Vec<String>,
}

/// Result of comparing the camera image with the focal-plane hologram.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub height_um: f64,
    /// Largest value of `M^2 * camera - hologram`.
    pub max_difference: f64,
    /// Smallest value of `M^2 * camera - hologram`.
    pub min_difference: f64,
}

/// Compute the discretisation plan of the configured optical train.
pub fn plan(job: &JobConfig) -> Result<DiscretizationPlan> {
    let optics = &job.optics;
    discretize_plan(
        optics.numerical_aperture,
        optics.magnification,
        optics.wavelength,
        optics.n_image,
        optics.pixel_pitch,
    )
    .context("Failed to plan the pupil discretisation")
}

/// Render one image per height (µm) in parallel.
pub fn run_render(job: &JobConfig, heights_um: &[f64]) -> Result<Vec<RenderedImage>> {
    let sphere = job.sphere();
    let options = job.render_options();
    let heights_px: Vec<f64> = heights_um.iter().map(|z| z / job.optics.pixel_pitch).collect();

    let results = render_batch(&heights_px, &sphere, &job.optics, &options);

    heights_um
        .iter()
        .zip(results)
        .map(|(&height_um, result)| {
            let image = result.with_context(|| format!("Rendering failed at z = {} µm", height_um))?;
            log::info!(
                "z = {:.3} µm: {}x{} image, peak intensity {:.4e}",
                height_um,
                image.nrows(),
                image.ncols(),
                image.iter().cloned().fold(0.0, f64::max)
            );
            Ok(RenderedImage { height_um, image })
        })
        .collect()
}

/// Render the camera image and the focal-plane hologram at `height_um` and
/// report their difference.
pub fn run_compare(job: &JobConfig, height_um: f64) -> Result<ComparisonReport> {
    let sphere = job.sphere();
    let z = height_um / job.optics.pixel_pitch;

    let camera = render_camera_image_with(z, &sphere, &job.optics, &job.render_options())
        .with_context(|| format!("Rendering failed at z = {} µm", height_um))?;
    let hologram = focal_plane_hologram([0.0, 0.0, z], &sphere, &job.optics, camera.dim())
        .context("Failed to compute the focal-plane hologram")?;

    let m_sq = job.optics.magnification.powi(2);
    let diff = camera * m_sq - &hologram;

    Ok(ComparisonReport {
        height_um,
        max_difference: diff.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        min_difference: diff.iter().cloned().fold(f64::INFINITY, f64::min),
    })
}

/// File name of the image rendered at `height_um`.
pub fn image_file_name(height_um: f64) -> String {
    format!("camera_z{:.2}.csv", height_um)
}

/// Write an intensity image as comma-separated rows with a metadata header.
pub fn write_image_csv(rendered: &RenderedImage, path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut file = std::io::BufWriter::new(file);

    writeln!(file, "# dwscope camera-plane intensity")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# z_um: {}", rendered.height_um)?;
    writeln!(
        file,
        "# particle: radius={} um, n={}",
        job.particle.radius, job.particle.refractive_index
    )?;
    writeln!(
        file,
        "# optics: NA={}, M={}, wavelength={} um, pitch={} um, n_medium={}, n_image={}",
        job.optics.numerical_aperture,
        job.optics.magnification,
        job.optics.wavelength,
        job.optics.pixel_pitch,
        job.optics.n_medium,
        job.optics.n_image
    )?;
    writeln!(file, "# shape: {}x{}", rendered.image.nrows(), rendered.image.ncols())?;

    for row in rendered.image.rows() {
        let line = row
            .iter()
            .map(|v| format!("{:.6e}", v))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(file, "{}", line)?;
    }
    file.flush()?;

    println!("Image written to: {}", path.display());
    Ok(())
}

/// Write render metadata to a JSON file.
pub fn write_metadata_json(metadata: &RenderMetadata, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(metadata).context("JSON serialisation error")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Metadata written to: {}", path.display());
    Ok(())
}

/// Write every image of a render and, if configured, its metadata.
pub fn write_render(images: &[RenderedImage], out_dir: &Path, job: &JobConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(images.len());
    for rendered in images {
        let path = out_dir.join(image_file_name(rendered.height_um));
        write_image_csv(rendered, &path, job)?;
        written.push(path);
    }

    if job.output.save_json {
        let plan = plan(job)?;
        let metadata = RenderMetadata {
            version: env!("CARGO_PKG_VERSION"),
            optics: job.optics.clone(),
            particle: job.sphere(),
            plan,
            effective_pitch: plan.effective_pitch(job.optics.wavelength, job.optics.numerical_aperture),
            aperture: job.imaging.aperture,
            heights_um: images.iter().map(|r| r.height_um).collect(),
            files: written
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect(),
        };
        write_metadata_json(&metadata, &out_dir.join("render.json"))?;
    }

    Ok(written)
}
