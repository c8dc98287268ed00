//! # dwscope Core
//!
//! Camera-plane imaging of a spherical scatterer in a microscope, computed
//! with the Debye-Wolf vectorial diffraction integral.
//!
//! ## Architecture
//!
//! The pipeline in [`pipeline`] is a chain of pure stage functions over
//! immutable value types. A render plans the pupil sampling, evaluates the
//! Mie strength factor on the object-side pupil, displaces it to the
//! scatterer's height, maps it through the objective and tube lens under the
//! Abbe sine condition, and refocuses it onto the camera with a padded
//! Fourier transform before forming the intensity image.
//!
//! ## Modules
//!
//! - [`types`]: Optical system, scatterer and render options.
//! - [`pipeline`]: Imaging stages and the [`render_camera_image`] entry point.
//! - [`mie`]: Analytical Mie coefficients.
//! - [`fields`]: Scattered field and far-field strength factor of a sphere.
//! - [`fft`]: Padded 2-D FFT and `fftshift`.
//! - [`hologram`]: Reference focal-plane hologram for comparison.

pub mod fft;
pub mod fields;
pub mod hologram;
pub mod mie;
pub mod pipeline;
pub mod types;

pub use hologram::focal_plane_hologram;
pub use pipeline::{
    discretize_plan, render_batch, render_camera_image, render_camera_image_with,
    DiscretizationPlan, ImagingError,
};
pub use types::{OpticalSystem, RenderOptions, Sphere};
