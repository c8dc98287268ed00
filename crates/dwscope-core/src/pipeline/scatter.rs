//! Angular spectrum at the entrance pupil.
//!
//! Each propagating direction $(s_x, s_y, \cos\theta)$ of the object-side
//! grid is traced to a point on a sphere of radius $r$ around the
//! scatterer, where the far-field strength factor of the Mie field is
//! evaluated (Capoglu et al., Eq. 40). Evanescent directions stay zero.

use dwscope_geometry::{Grid, VectorField};
use ndarray::Array1;
use num_complex::Complex64;

use super::ImagingError;
use crate::fields::{spherical_field, Basis, FieldMode};
use crate::mie::mie_coefficients;
use crate::types::{OpticalSystem, Sphere};

/// Compute the strength factor arriving at the entrance pupil, in the
/// spherical basis $(\hat r, \hat\theta, \hat\phi)$.
///
/// # Arguments
/// * `s_obj` - Object-side direction-cosine grid.
/// * `sphere` - The scatterer.
/// * `system` - Optical train (medium index, wavelength, pixel pitch).
/// * `pupil_radius` - Nominal radius of the evaluation sphere (pixels).
pub fn scatter(
    s_obj: &Grid,
    sphere: &Sphere,
    system: &OpticalSystem,
    pupil_radius: f64,
) -> Result<VectorField, ImagingError> {
    let coefficients = mie_coefficients(
        sphere.radius,
        Complex64::new(sphere.refractive_index, 0.0),
        system.n_medium,
        system.wavelength,
    )?;
    let wavelength_medium = system.medium_wavelength_pixels();

    let sxx = s_obj.first_axis();
    let syy = s_obj.second_axis();

    let mut indices = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut z = Vec::new();
    for ((i, j), &sx) in sxx.indexed_iter() {
        let sy = syy[[i, j]];
        let rho_sq = sx * sx + sy * sy;
        if rho_sq < 1.0 {
            indices.push((i, j));
            x.push(sx * pupil_radius);
            y.push(sy * pupil_radius);
            z.push((1.0 - rho_sq).sqrt() * pupil_radius);
        }
    }

    let (x, y, z) = (Array1::from(x), Array1::from(y), Array1::from(z));
    let values = spherical_field(
        x.view(),
        y.view(),
        z.view(),
        &coefficients,
        wavelength_medium,
        Basis::Spherical,
        FieldMode::StrengthFactor,
    );

    let mut ang_spec = VectorField::zeros(s_obj.dim());
    for c in 0..3 {
        let mut component = ang_spec.component_mut(c);
        for (&(i, j), &v) in indices.iter().zip(values.row(c).iter()) {
            component[[i, j]] = v;
        }
    }

    log::debug!(
        "scatter: {} propagating directions, n_max = {}, max |A| = {:.3e}",
        indices.len(),
        coefficients.n_max(),
        ang_spec.max_norm()
    );

    Ok(ang_spec)
}
