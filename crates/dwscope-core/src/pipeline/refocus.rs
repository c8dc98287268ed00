//! Refocusing the exit-pupil spectrum onto the camera.
//!
//! The Debye-Wolf integral over image-side direction cosines is evaluated
//! as a zero-padded discrete Fourier transform (Capoglu et al., Eqs.
//! 133–135):
//!
//! 1. $g = \mathbf{A}\,e^{-i 2\pi W / \lambda} / \cos\theta_{img}$, with
//!    $W$ the pupil aberration;
//! 2. $\tilde g = \mathrm{fftshift}\bigl(\mathrm{DFT}_{N_p \times N_q}(g)\bigr)$;
//! 3. $\mathbf{E}_{cam} = \frac{i\,NA^2}{M^2 \lambda\, n_{img}} \frac{4}{PQ}\,\tilde g$;
//! 4. multiply by $\exp\bigl(-i\pi\,[\,m(1-P)/N_p + n(1-Q)/N_q\,]\bigr)$,
//!    which removes the linear phase introduced by the pupil samples
//!    starting at index 0 rather than at the pupil centre.

use dwscope_geometry::{Grid, SphericalGeometry, VectorField};
use ndarray::{Array2, Array3};
use num_complex::Complex64;

use super::plan::DiscretizationPlan;
use super::ImagingError;
use crate::fft::{fft2_padded, fftshift};
use crate::types::OpticalSystem;

/// Below this $\cos\theta_{img}$ the obliquity division is treated as
/// singular and the sample is dropped.
const COSTHETA_FLOOR: f64 = 1e-12;

/// Propagate the image-side strength factor (cartesian basis) from the exit
/// pupil to the camera plane.
///
/// # Arguments
/// * `es_img` - Strength factor leaving the exit pupil, shape `(3, p, q)`.
/// * `s_img` - Image-side spherical geometry.
/// * `index_grid` - Centred pixel-index grid of the padded output, shape
///   `(Np, Nq)`.
/// * `plan` - Pupil sampling and padding.
/// * `system` - Optical train.
/// * `aberration` - Optional pupil optical path difference (µm), shape
///   `(3, p, q)`.
pub fn refocus(
    es_img: &VectorField,
    s_img: &SphericalGeometry,
    index_grid: &Grid,
    plan: &DiscretizationPlan,
    system: &OpticalSystem,
    aberration: Option<&Array3<f64>>,
) -> Result<VectorField, ImagingError> {
    let (p, q) = plan.pupil_shape();
    let (np, nq) = plan.padded_shape();

    if es_img.dim() != (p, q) {
        return Err(ImagingError::shape_mismatch((p, q), es_img.dim()));
    }
    if s_img.dim() != (p, q) {
        return Err(ImagingError::shape_mismatch((p, q), s_img.dim()));
    }
    if index_grid.dim() != (np, nq) {
        return Err(ImagingError::shape_mismatch((np, nq), index_grid.dim()));
    }
    if let Some(aber) = aberration {
        if aber.dim() != (3, p, q) {
            return Err(ImagingError::AberrationShape {
                expected: [3, p, q],
                found: aber.shape().to_vec(),
            });
        }
    }

    let lambda = system.wavelength;
    let na = system.numerical_aperture;
    let m = system.magnification;

    let costheta = s_img.costheta();
    let guarded = costheta.iter().filter(|&&ct| ct <= COSTHETA_FLOOR).count();
    if guarded > 0 {
        log::debug!("refocus: dropped {} samples with cos(theta) near zero", guarded);
    }

    let prefactor = Complex64::new(0.0, na * na / (m * m * lambda * system.n_image))
        * (4.0 / (p * q) as f64);
    let correction = alias_correction(index_grid, plan);

    let mut es_cam = VectorField::zeros((np, nq));
    for c in 0..3 {
        let component = es_img.component(c);
        let g_aux = Array2::from_shape_fn((p, q), |(i, j)| {
            let ct = costheta[[i, j]];
            if ct <= COSTHETA_FLOOR {
                return Complex64::new(0.0, 0.0);
            }
            let phase = match aberration {
                Some(aber) => {
                    Complex64::new(0.0, -2.0 * std::f64::consts::PI * aber[[c, i, j]] / lambda).exp()
                }
                None => Complex64::new(1.0, 0.0),
            };
            component[[i, j]] * phase / ct
        });

        let spectrum = fftshift(fft2_padded(g_aux.view(), (np, nq)).view());

        let mut out = es_cam.component_mut(c);
        out.assign(&(spectrum * prefactor * &correction));
    }

    log::debug!(
        "refocus: {}x{} pupil -> {}x{} camera, max |E_s| = {:.3e}",
        p,
        q,
        np,
        nq,
        es_cam.max_norm()
    );

    Ok(es_cam)
}

/// Phase $\exp(-i\pi[m(1-P)/N_p + n(1-Q)/N_q])$ on the centred index grid.
fn alias_correction(index_grid: &Grid, plan: &DiscretizationPlan) -> Array2<Complex64> {
    let (p, q) = plan.pupil_shape();
    let (np, nq) = plan.padded_shape();
    let mm = index_grid.first_axis();
    let nn = index_grid.second_axis();

    Array2::from_shape_fn(index_grid.dim(), |(i, j)| {
        let arg = mm[[i, j]] * (1.0 - p as f64) / np as f64 + nn[[i, j]] * (1.0 - q as f64) / nq as f64;
        Complex64::new(0.0, -std::f64::consts::PI * arg).exp()
    })
}
