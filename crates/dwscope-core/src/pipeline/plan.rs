//! Discretisation of the pupil plane.
//!
//! The pupil grid must resolve the angular spectrum of the largest scatterer
//! of interest, and the zero padding applied before the Fourier transform
//! sets the camera-plane sampling. Following Capoglu et al. (Eqs. 130–131):
//!
//! - a scatterer spanning 20 wavelengths needs $P = Q = \lfloor 400\,NA \rfloor$
//!   pupil samples;
//! - padding each axis by $\lfloor P\,(\lambda - 2\,\delta\,NA) / (2\,\delta\,NA) \rfloor$
//!   makes the transform's output spacing equal the pixel pitch $\delta$.

use serde::Serialize;

use super::ImagingError;

/// Assumed diameter of the largest scatterer, in wavelengths, times the
/// two samples per period needed to resolve it.
const SAMPLES_PER_UNIT_NA: f64 = 400.0;

/// Pupil-grid dimensions and the zero padding applied before refocusing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscretizationPlan {
    pub pad_p: usize,
    pub pad_q: usize,
    pub p: usize,
    pub q: usize,
}

impl DiscretizationPlan {
    /// Unpadded pupil-grid shape `(p, q)`.
    pub fn pupil_shape(&self) -> (usize, usize) {
        (self.p, self.q)
    }

    /// Padded transform shape `(Np, Nq)`; also the camera image shape.
    pub fn padded_shape(&self) -> (usize, usize) {
        (self.p + self.pad_p, self.q + self.pad_q)
    }

    /// Camera-plane sampling referred to the object plane,
    /// $\lambda P / (2\,NA\,N_p)$, along the first axis.
    pub fn effective_pitch(&self, wavelength: f64, numerical_aperture: f64) -> f64 {
        let (np, _) = self.padded_shape();
        wavelength * self.p as f64 / (2.0 * numerical_aperture * np as f64)
    }
}

/// Devise the pupil sampling and padding for a given optical train.
///
/// # Arguments
/// * `numerical_aperture` - Objective NA.
/// * `magnification` - Lateral magnification.
/// * `wavelength` - Vacuum wavelength (µm).
/// * `n_image` - Image-side refractive index.
/// * `pixel_pitch` - Desired camera pitch referred to the object (µm/pixel).
///
/// # Errors
/// [`ImagingError::Undersampled`] when $\lambda < 2\,\delta\,NA$, where the
/// requested pitch cannot be reached by zero padding.
pub fn discretize_plan(
    numerical_aperture: f64,
    magnification: f64,
    wavelength: f64,
    n_image: f64,
    pixel_pitch: f64,
) -> Result<DiscretizationPlan, ImagingError> {
    for (name, value) in [
        ("numerical_aperture", numerical_aperture),
        ("magnification", magnification),
        ("wavelength", wavelength),
        ("n_image", n_image),
        ("pixel_pitch", pixel_pitch),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ImagingError::InvalidParameter { name, value });
        }
    }

    let p = (SAMPLES_PER_UNIT_NA * numerical_aperture) as usize;
    let q = p;
    if p == 0 {
        return Err(ImagingError::InvalidParameter {
            name: "numerical_aperture",
            value: numerical_aperture,
        });
    }

    let nyquist = 2.0 * pixel_pitch * numerical_aperture;
    if wavelength < nyquist {
        return Err(ImagingError::Undersampled {
            wavelength,
            limit: nyquist,
        });
    }

    let ratio = (wavelength - nyquist) / nyquist;
    let pad_p = (ratio * p as f64) as usize;
    let pad_q = (ratio * q as f64) as usize;

    Ok(DiscretizationPlan { pad_p, pad_q, p, q })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_train_plan() {
        let plan = discretize_plan(1.45, 100.0, 0.447, 1.0, 0.135).unwrap();
        assert_eq!(plan, DiscretizationPlan { pad_p: 82, pad_q: 82, p: 580, q: 580 });
        assert_eq!(plan.padded_shape(), (662, 662));
    }

    #[test]
    fn test_padding_reproduces_pixel_pitch() {
        let plan = discretize_plan(1.45, 100.0, 0.447, 1.0, 0.135).unwrap();
        assert_relative_eq!(plan.effective_pitch(0.447, 1.45), 0.135, max_relative = 1e-2);
    }

    #[test]
    fn test_exact_nyquist_needs_no_padding() {
        let plan = discretize_plan(1.0, 60.0, 0.5, 1.0, 0.25).unwrap();
        assert_eq!((plan.pad_p, plan.pad_q), (0, 0));
    }

    #[test]
    fn test_undersampled_train_is_rejected() {
        let err = discretize_plan(1.45, 100.0, 0.447, 1.0, 0.2).unwrap_err();
        assert!(matches!(err, ImagingError::Undersampled { .. }));
    }

    #[test]
    fn test_non_physical_inputs_are_rejected() {
        assert!(discretize_plan(0.0, 100.0, 0.447, 1.0, 0.135).is_err());
        assert!(discretize_plan(1.45, -1.0, 0.447, 1.0, 0.135).is_err());
        assert!(discretize_plan(1.45, 100.0, f64::NAN, 1.0, 0.135).is_err());
        assert!(discretize_plan(1e-4, 100.0, 0.447, 1.0, 0.135).is_err());
    }
}
