//! Axial propagation of the angular spectrum and of the incident wave.
//!
//! Moving the scatterer a distance $z$ along the optical axis multiplies
//! each plane-wave component of its angular spectrum by
//! $\exp(i k z \cos\theta)$ (Goodman, *Introduction to Fourier Optics*,
//! §3.10.2).

use dwscope_geometry::{Grid, VectorField};
use ndarray::Array2;
use num_complex::Complex64;

use super::ImagingError;

/// Displacement phase $\exp\bigl(i k z \sqrt{1 - s_x^2 - s_y^2}\bigr)$ for
/// each direction of `s_obj`; zero outside the propagating disk.
///
/// # Arguments
/// * `s_obj` - Object-side direction-cosine grid.
/// * `z` - Axial displacement (pixels).
/// * `k` - Object-side wavenumber (inverse pixels).
pub fn displacement(s_obj: &Grid, z: f64, k: f64) -> Array2<Complex64> {
    let syy = s_obj.second_axis();
    let mut disp = Array2::zeros(s_obj.dim());
    for ((i, j), &sx) in s_obj.first_axis().indexed_iter() {
        let sy = syy[[i, j]];
        let rho_sq = sx * sx + sy * sy;
        if rho_sq < 1.0 {
            disp[[i, j]] = Complex64::new(0.0, k * z * (1.0 - rho_sq).sqrt()).exp();
        }
    }
    disp
}

/// Apply a displacement mask to the transverse components (θ, φ) of an
/// angular spectrum. The radial component is left unscaled.
pub fn displace(ang_spec: &VectorField, disp: &Array2<Complex64>) -> Result<VectorField, ImagingError> {
    if ang_spec.dim() != disp.dim() {
        return Err(ImagingError::shape_mismatch(ang_spec.dim(), disp.dim()));
    }

    let mut out = ang_spec.clone();
    for c in 1..3 {
        let mut component = out.component_mut(c);
        component *= disp;
    }
    Ok(out)
}

/// A uniform plane wave polarised along the first (x) component after
/// propagating `path_len` with wavenumber `k`:
/// $E_x = A\,e^{-ik\ell}$, all other components zero.
pub fn propagate_plane_wave(amplitude: f64, k: f64, path_len: f64, dim: (usize, usize)) -> VectorField {
    let value = amplitude * Complex64::new(0.0, -k * path_len).exp();
    let mut e_inc = VectorField::zeros(dim);
    e_inc.component_mut(0).fill(value);
    e_inc
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> Grid {
        Grid::centered(31, 31, [0.08, 0.08])
    }

    #[test]
    fn test_unit_modulus_inside_and_zero_outside() {
        let grid = grid();
        let disp = displacement(&grid, 74.07, 2.54);
        for ((i, j), v) in disp.indexed_iter() {
            let sx = grid.first_axis()[[i, j]];
            let sy = grid.second_axis()[[i, j]];
            if sx * sx + sy * sy < 1.0 {
                assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
            } else {
                assert_eq!(*v, Complex64::new(0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_zero_displacement_is_identity_inside_disk() {
        let grid = grid();
        let disp = displacement(&grid, 0.0, 2.54);
        for ((i, j), v) in disp.indexed_iter() {
            let sx = grid.first_axis()[[i, j]];
            let sy = grid.second_axis()[[i, j]];
            if sx * sx + sy * sy < 1.0 {
                assert_eq!(*v, Complex64::new(1.0, 0.0));
            }
        }
    }

    #[test]
    fn test_on_axis_phase_is_kz() {
        let grid = Grid::centered(3, 3, [0.1, 0.1]);
        let disp = displacement(&grid, 2.0, 0.25);
        assert_relative_eq!(disp[[1, 1]].arg(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_displace_leaves_radial_component_untouched() {
        let dim = (5, 5);
        let one = Complex64::new(1.0, 0.0);
        let spec = VectorField::from_array(ndarray::Array3::from_elem((3, 5, 5), one)).unwrap();
        let mask = Array2::from_elem(dim, Complex64::new(0.0, 2.0));

        let out = displace(&spec, &mask).unwrap();
        assert!(out.component(0).iter().all(|&v| v == one));
        assert!(out.component(1).iter().all(|&v| v == Complex64::new(0.0, 2.0)));
        assert!(out.component(2).iter().all(|&v| v == Complex64::new(0.0, 2.0)));

        let wrong = Array2::from_elem((4, 5), one);
        assert!(displace(&spec, &wrong).is_err());
    }

    #[test]
    fn test_plane_wave_is_x_polarised() {
        let e = propagate_plane_wave(-0.01, 2.54, 74.07, (4, 6));
        assert_eq!(e.dim(), (4, 6));
        for v in e.component(0).iter() {
            assert_relative_eq!(v.norm(), 0.01, epsilon = 1e-15);
        }
        assert!(e.component(1).iter().all(|v| v.norm() == 0.0));
        assert!(e.component(2).iter().all(|v| v.norm() == 0.0));
    }
}
