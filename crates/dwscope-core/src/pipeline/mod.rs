//! The Debye-Wolf imaging pipeline.
//!
//! A render proceeds through the following stages, each a pure function in
//! its own module:
//!
//! 1. [`plan`]: pupil sampling and Fourier padding.
//! 2. [`scatter`]: Mie strength factor on the object-side pupil grid.
//! 3. [`propagate`]: axial displacement of the scatterer and the incident
//!    plane wave.
//! 4. [`collect`]: energy-conserving mapping to the image side, with an
//!    optional hard aperture.
//! 5. [`refocus`]: padded Fourier transform onto the camera plane.
//! 6. [`image`]: coherent superposition with the incident wave and
//!    intensity.
//!
//! [`render_camera_image`] chains them for one scatterer height;
//! [`render_batch`] renders many heights in parallel.
//!
//! # Reference
//! I. R. Capoglu, J. D. Rogers, A. Taflove and V. Backman, "The Microscope in
//! a Computer: Image Synthesis from Three-Dimensional Full-Vector Solutions of
//! Maxwell's Equations at the Nanometer Scale", *Prog. Opt.* **57**, 1 (2012).

pub mod collect;
pub mod image;
pub mod plan;
pub mod propagate;
pub mod refocus;
pub mod scatter;

use dwscope_geometry::{spherical_to_cartesian, GeometryError, Grid};
use ndarray::Array2;
use rayon::prelude::*;
use thiserror::Error;

use crate::mie::MieError;
use crate::types::{OpticalSystem, RenderOptions, Sphere};

pub use collect::{aperture, collection, conserve_energy};
pub use image::image_formation;
pub use plan::{discretize_plan, DiscretizationPlan};
pub use propagate::{displace, displacement, propagate_plane_wave};
pub use refocus::refocus;
pub use scatter::scatter;

/// Radius (pixels) of the sphere on which the far-field strength factor is
/// sampled. Any value in the far zone gives the same strength factor.
pub const PUPIL_RADIUS: f64 = 100.0;

/// Errors raised by the imaging pipeline.
#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("Parameter `{name}` must be positive and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error(
        "Pixel pitch is too coarse for the pupil: wavelength {wavelength} µm is below 2·pitch·NA = {limit} µm"
    )]
    Undersampled { wavelength: f64, limit: f64 },

    #[error("Aberration map must have shape {expected:?}, found {found:?}")]
    AberrationShape { expected: [usize; 3], found: Vec<usize> },

    #[error("Mie solver failed: {0}")]
    Mie(#[from] MieError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

impl ImagingError {
    pub(crate) fn shape_mismatch(expected: (usize, usize), found: (usize, usize)) -> Self {
        ImagingError::Geometry(GeometryError::ShapeMismatch {
            expected: vec![expected.0, expected.1],
            found: vec![found.0, found.1],
        })
    }
}

/// Render the camera-plane image of `sphere` at height `z` (pixels) above
/// the focal plane, with default [`RenderOptions`].
pub fn render_camera_image(z: f64, sphere: &Sphere, system: &OpticalSystem) -> Result<Array2<f64>, ImagingError> {
    render_camera_image_with(z, sphere, system, &RenderOptions::default())
}

/// Render the camera-plane image of `sphere` at height `z` (pixels).
///
/// # Returns
/// Intensity on the `(Np, Nq)` camera grid of [`discretize_plan`], with the
/// incident wave at amplitude $1/M$.
///
/// # Errors
/// Every configuration error (non-physical parameters, undersampling, a
/// mis-shaped aberration map) is reported before any stage runs.
pub fn render_camera_image_with(
    z: f64,
    sphere: &Sphere,
    system: &OpticalSystem,
    options: &RenderOptions,
) -> Result<Array2<f64>, ImagingError> {
    if !z.is_finite() {
        return Err(ImagingError::NonFinite { name: "z", value: z });
    }
    sphere.validate()?;
    system.validate()?;

    let plan = discretize_plan(
        system.numerical_aperture,
        system.magnification,
        system.wavelength,
        system.n_image,
        system.pixel_pitch,
    )?;
    let (p, q) = plan.pupil_shape();
    let (np, nq) = plan.padded_shape();

    if let Some(aber) = &options.aberration {
        if aber.dim() != (3, p, q) {
            return Err(ImagingError::AberrationShape {
                expected: [3, p, q],
                found: aber.shape().to_vec(),
            });
        }
    }
    if let Some(dim) = options.output_dim {
        log::warn!(
            "Requested output size {}x{} ignored; the image is {}x{} as set by the Fourier padding",
            dim[0],
            dim[1],
            np,
            nq
        );
    }

    log::debug!(
        "render: z = {:.3} px, pupil {}x{}, padded {}x{}, effective pitch {:.4} µm",
        z,
        p,
        q,
        np,
        nq,
        plan.effective_pitch(system.wavelength, system.numerical_aperture)
    );

    let na = system.numerical_aperture;
    let m = system.magnification;
    let obj_factor = 2.0 * na / system.n_medium;
    let img_factor = 2.0 * system.image_side_sine();

    let s_obj_grid = Grid::centered(p, q, [obj_factor / p as f64, obj_factor / q as f64]);
    let s_img_grid = Grid::centered(p, q, [img_factor / p as f64, img_factor / q as f64]);
    let index_grid = Grid::centered_indices(np, nq);

    let s_obj = s_obj_grid.acquire_spherical(1.0)?;
    let s_img = s_img_grid.acquire_spherical(1.0)?;

    let k_obj = system.object_wavenumber();

    let e_inc = propagate_plane_wave(-1.0 / m, k_obj, z, (np, nq));

    let ang_spec = scatter(&s_obj_grid, sphere, system, PUPIL_RADIUS)?;
    let ang_spec = displace(&ang_spec, &displacement(&s_obj_grid, z, k_obj))?;

    let aperture_radius = options.aperture.then(|| system.image_side_sine());
    let es_img = collection(&ang_spec, &s_obj, &s_img_grid, &s_img, m, aperture_radius)?;
    let es_img = spherical_to_cartesian(&es_img, &s_img)?;

    let es_cam = refocus(
        &es_img,
        &s_img,
        &index_grid,
        &plan,
        system,
        options.aberration.as_ref(),
    )?;

    image_formation(&es_cam, &e_inc)
}

/// Render several heights in parallel.
///
/// Each height is independent; results are returned in the order of
/// `heights`, one `Result` per height.
pub fn render_batch(
    heights: &[f64],
    sphere: &Sphere,
    system: &OpticalSystem,
    options: &RenderOptions,
) -> Vec<Result<Array2<f64>, ImagingError>> {
    log::info!("Rendering {} heights", heights.len());
    heights
        .par_iter()
        .map(|&z| render_camera_image_with(z, sphere, system, options))
        .collect()
}
