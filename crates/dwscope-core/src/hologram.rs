//! Reference in-line hologram in the focal plane.
//!
//! The Lorenz-Mie model of an in-line hologram records the interference of
//! the unit-amplitude illumination with the light scattered by a sphere a
//! height $z_p$ above the focal plane,
//!
//! $$
//! I(\mathbf{r}) = \bigl|\hat x + \mathbf{E}_s(\mathbf{r} - \mathbf{r}_p)\,e^{-ikz_p}\bigr|^2,
//! $$
//!
//! with no lens between the scatterer and the detector. Comparing it with
//! `M²` times the Debye-Wolf camera image checks the imaging pipeline.

use dwscope_geometry::Grid;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::fields::{spherical_field, Basis, FieldMode};
use crate::mie::mie_coefficients;
use crate::pipeline::ImagingError;
use crate::types::{OpticalSystem, Sphere};

/// Compute the focal-plane hologram of `sphere`.
///
/// # Arguments
/// * `position` - Particle position `[x, y, z]` in pixels; `x` and `y` are
///   measured from the image centre `(N/2)` and `z` above the focal
///   plane.
/// * `sphere` - The scatterer.
/// * `system` - Supplies the medium index, wavelength and pixel pitch.
/// * `dim` - Image shape.
pub fn focal_plane_hologram(
    position: [f64; 3],
    sphere: &Sphere,
    system: &OpticalSystem,
    dim: (usize, usize),
) -> Result<Array2<f64>, ImagingError> {
    for (name, value) in [("x", position[0]), ("y", position[1])] {
        if !value.is_finite() {
            return Err(ImagingError::NonFinite { name, value });
        }
    }
    let zp = position[2];
    if !(zp.is_finite() && zp > 0.0) {
        return Err(ImagingError::InvalidParameter { name: "z", value: zp });
    }

    let coefficients = mie_coefficients(
        sphere.radius,
        Complex64::new(sphere.refractive_index, 0.0),
        system.n_medium,
        system.wavelength,
    )?;
    let wavelength_medium = system.medium_wavelength_pixels();
    let k = system.object_wavenumber();

    // Same centre pixel as the fftshift-ed camera image.
    let grid = Grid::new(dim.0, dim.1, [(dim.0 / 2) as f64, (dim.1 / 2) as f64], [1.0, 1.0]);
    let x: Array1<f64> = grid.first_axis().iter().map(|&x| x - position[0]).collect();
    let y: Array1<f64> = grid.second_axis().iter().map(|&y| y - position[1]).collect();
    let z = Array1::from_elem(x.len(), zp);

    let mut field = spherical_field(
        x.view(),
        y.view(),
        z.view(),
        &coefficients,
        wavelength_medium,
        Basis::Cartesian,
        FieldMode::Field,
    );
    field *= Complex64::new(0.0, -k * zp).exp();
    field.row_mut(0).mapv_inplace(|e| e + 1.0);

    let cols = dim.1;
    let hologram = Array2::from_shape_fn(dim, |(i, j)| {
        field.column(i * cols + j).iter().map(|e| e.norm_sqr()).sum::<f64>()
    });

    log::debug!(
        "hologram: {}x{} at z = {:.3} px, n_max = {}",
        dim.0,
        dim.1,
        zp,
        coefficients.n_max()
    );

    Ok(hologram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bead() -> Sphere {
        Sphere::new(0.5, 1.5)
    }

    #[test]
    fn test_hologram_is_finite_with_unit_background() {
        let system = OpticalSystem::default();
        let image = focal_plane_hologram([0.0, 0.0, 74.07], &bead(), &system, (41, 41)).unwrap();
        assert_eq!(image.dim(), (41, 41));
        assert!(image.iter().all(|v| v.is_finite() && *v >= 0.0));

        let mean = image.mean().unwrap();
        assert!((mean - 1.0).abs() < 0.5, "mean intensity {}", mean);
    }

    #[test]
    fn test_hologram_has_mirror_symmetry() {
        let system = OpticalSystem::default();
        let image = focal_plane_hologram([0.0, 0.0, 50.0], &bead(), &system, (31, 31)).unwrap();
        let c = 15;
        for d in 1..10 {
            assert_relative_eq!(image[[c - d, c]], image[[c + d, c]], max_relative = 1e-9);
            assert_relative_eq!(image[[c, c - d]], image[[c, c + d]], max_relative = 1e-9);
        }
    }

    #[test]
    fn test_even_image_is_centred_on_half_width_pixel() {
        let system = OpticalSystem::default();
        let image = focal_plane_hologram([0.0, 0.0, 50.0], &bead(), &system, (32, 32)).unwrap();
        let c = 16;
        for d in 1..16 {
            assert_relative_eq!(image[[c - d, c]], image[[c + d, c]], max_relative = 1e-9);
            assert_relative_eq!(image[[c, c - d]], image[[c, c + d]], max_relative = 1e-9);
        }
    }

    #[test]
    fn test_lateral_offset_moves_the_pattern() {
        let system = OpticalSystem::default();
        let centred = focal_plane_hologram([0.0, 0.0, 50.0], &bead(), &system, (31, 31)).unwrap();
        let shifted = focal_plane_hologram([3.0, 0.0, 50.0], &bead(), &system, (31, 31)).unwrap();
        for j in 0..31 {
            assert_relative_eq!(shifted[[18, j]], centred[[15, j]], max_relative = 1e-9);
        }
    }

    #[test]
    fn test_particle_in_focal_plane_is_rejected() {
        let system = OpticalSystem::default();
        let err = focal_plane_hologram([0.0, 0.0, 0.0], &bead(), &system, (5, 5)).unwrap_err();
        assert!(matches!(err, ImagingError::InvalidParameter { name: "z", .. }));
    }
}
