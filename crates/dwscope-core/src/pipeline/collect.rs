//! Collection through the objective and tube lens.
//!
//! Under the Abbe sine condition a ray leaving the object at $\theta_{obj}$
//! reaches the image side at $\sin\theta_{img} = \sin\theta_{obj} / M$
//! (up to the index ratio). Energy conservation between the two solid
//! angles rescales the strength factor by
//! $-M\sqrt{\cos\theta_{img} / \cos\theta_{obj}}$ (Capoglu et al., Eq. 108);
//! the sign accounts for the image inversion and is paired with the
//! $-1/M$ amplitude of the incident wave in [`super::render_camera_image`].

use dwscope_geometry::{Grid, SphericalGeometry, VectorField};
use ndarray::Array2;
use num_complex::Complex64;

use super::ImagingError;

/// Rescale the strength factor from object-side to image-side solid-angle
/// density. Directions with $\cos\theta_{obj} = 0$ (evanescent) are zero.
pub fn conserve_energy(
    field: &VectorField,
    s_obj: &SphericalGeometry,
    s_img: &SphericalGeometry,
    magnification: f64,
) -> Result<VectorField, ImagingError> {
    if field.dim() != s_obj.dim() {
        return Err(ImagingError::shape_mismatch(field.dim(), s_obj.dim()));
    }
    if field.dim() != s_img.dim() {
        return Err(ImagingError::shape_mismatch(field.dim(), s_img.dim()));
    }

    let ct_img = s_img.costheta();
    let factor = Array2::from_shape_fn(field.dim(), |(i, j)| {
        let ct_obj = s_obj.costheta()[[i, j]];
        if ct_obj > 0.0 {
            Complex64::new(-magnification * (ct_img[[i, j]] / ct_obj).sqrt(), 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    });

    Ok(field.scaled_by(&factor)?)
}

/// Zero every component wherever $x^2 + y^2 \ge r_{\max}^2$ on `grid`.
pub fn aperture(field: &VectorField, grid: &Grid, r_max: f64) -> Result<VectorField, ImagingError> {
    let r_max_sq = r_max * r_max;
    let mask = grid.radius_sq().mapv(|r_sq| {
        if r_sq >= r_max_sq {
            Complex64::new(0.0, 0.0)
        } else {
            Complex64::new(1.0, 0.0)
        }
    });
    Ok(field.scaled_by(&mask)?)
}

/// Angular spectrum leaving the exit pupil.
///
/// # Arguments
/// * `ang_spec` - Strength factor at the entrance pupil (spherical basis).
/// * `s_obj` - Object-side spherical geometry.
/// * `s_img_grid` - Image-side direction-cosine grid.
/// * `s_img` - Image-side spherical geometry.
/// * `magnification` - Lateral magnification.
/// * `aperture_radius` - If set, apply a hard pupil of this radius in
///   image-side direction cosines.
pub fn collection(
    ang_spec: &VectorField,
    s_obj: &SphericalGeometry,
    s_img_grid: &Grid,
    s_img: &SphericalGeometry,
    magnification: f64,
    aperture_radius: Option<f64>,
) -> Result<VectorField, ImagingError> {
    let es_img = conserve_energy(ang_spec, s_obj, s_img, magnification)?;

    match aperture_radius {
        Some(r_max) => aperture(&es_img, s_img_grid, r_max),
        None => Ok(es_img),
    }
}
