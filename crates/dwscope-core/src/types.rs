//! Core types shared across the dwscope pipeline.
//!
//! This module defines the read-only inputs of one imaging run: the optical
//! train ([`OpticalSystem`]), the scatterer ([`Sphere`]) and the optional
//! pipeline switches ([`RenderOptions`]).

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::pipeline::ImagingError;

/// Parameters of the microscope's optical train.
///
/// Lengths are in micrometres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticalSystem {
    /// Refractive index of the medium immersing the scatterer.
    pub n_medium: f64,
    /// Refractive index of the medium immersing the camera.
    pub n_image: f64,
    /// Numerical aperture of the objective.
    pub numerical_aperture: f64,
    /// Vacuum wavelength of the illumination (µm).
    pub wavelength: f64,
    /// Camera pixel pitch referred to the object plane (µm/pixel).
    pub pixel_pitch: f64,
    /// Lateral magnification of the optical train.
    pub magnification: f64,
    /// Objective focal length (µm). Carried for completeness; the
    /// Debye-Wolf integral does not depend on it.
    pub focal_length: f64,
}

impl Default for OpticalSystem {
    /// 100x oil objective, water immersion, blue laser, air-side camera.
    fn default() -> Self {
        Self {
            n_medium: 1.339,
            n_image: 1.0,
            numerical_aperture: 1.45,
            wavelength: 0.447,
            pixel_pitch: 0.135,
            magnification: 100.0,
            focal_length: 2.0e5,
        }
    }
}

impl OpticalSystem {
    /// Wavenumber in the object-side medium, in inverse pixels.
    pub fn object_wavenumber(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.n_medium / self.wavelength * self.pixel_pitch
    }

    /// Wavelength in the object-side medium, in pixels.
    pub fn medium_wavelength_pixels(&self) -> f64 {
        self.wavelength / self.n_medium / self.pixel_pitch
    }

    /// Sine of the marginal ray angle on the image side, $NA / (M n_{img})$.
    pub fn image_side_sine(&self) -> f64 {
        self.numerical_aperture / (self.magnification * self.n_image)
    }

    /// Check that every parameter is physical.
    pub fn validate(&self) -> Result<(), ImagingError> {
        let positive = [
            ("n_medium", self.n_medium),
            ("n_image", self.n_image),
            ("numerical_aperture", self.numerical_aperture),
            ("wavelength", self.wavelength),
            ("pixel_pitch", self.pixel_pitch),
            ("magnification", self.magnification),
            ("focal_length", self.focal_length),
        ];
        for (name, value) in positive {
            require_positive(name, value)?;
        }
        Ok(())
    }
}

/// A homogeneous spherical scatterer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Radius (µm).
    pub radius: f64,
    /// Refractive index (real).
    pub refractive_index: f64,
}

impl Sphere {
    pub fn new(radius: f64, refractive_index: f64) -> Self {
        Self {
            radius,
            refractive_index,
        }
    }

    pub fn validate(&self) -> Result<(), ImagingError> {
        require_positive("radius", self.radius)?;
        require_positive("refractive_index", self.refractive_index)
    }
}

/// Optional switches for a rendering run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Zero the collected field outside the image-side pupil
    /// $s_x^2 + s_y^2 \ge (NA / M n_{img})^2$. Off by default.
    pub aperture: bool,
    /// Optical path difference across the exit pupil (µm), shape `(3, p, q)`.
    /// `None` means an aberration-free system.
    pub aberration: Option<Array3<f64>>,
    /// Requested output size. Advisory only: the image size is set by the
    /// Fourier padding, so this is logged and otherwise ignored.
    pub output_dim: Option<[usize; 2]>,
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ImagingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ImagingError::InvalidParameter { name, value })
    }
}
