//! Analytical Mie theory for homogeneous spheres.
//!
//! Computes the electric ($a_n$) and magnetic ($b_n$) multipole coefficients
//! of a homogeneous sphere embedded in a lossless medium, plus the
//! extinction and scattering efficiencies derived from them. The coefficients
//! feed the spherical-field evaluator in [`crate::fields`].
//!
//! Conventions follow Bohren & Huffman with the series truncated at
//! Wiscombe's $n_{\max} = x + 4.05\,x^{1/3} + 2$ and the logarithmic
//! derivative $D_n(mx)$ obtained by downward recurrence.
//!
//! # Reference
//! Bohren & Huffman, *Absorption and Scattering of Light by Small Particles* (1983).
//! W. J. Wiscombe, "Improved Mie scattering algorithms", *Appl. Opt.* **19**, 1505 (1980).

use num_complex::Complex64;
use thiserror::Error;

/// Errors from the Mie coefficient solver.
#[derive(Debug, Error)]
pub enum MieError {
    #[error("Particle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Wavelength must be positive and finite, got {0}")]
    InvalidWavelength(f64),

    #[error("Refractive index of the {which} must be positive and finite, got {value}")]
    InvalidIndex { which: &'static str, value: f64 },
}

/// Mie coefficients $a_n$, $b_n$ for multipole orders $n = 1..=n_{\max}$.
#[derive(Debug, Clone, PartialEq)]
pub struct MieCoefficients {
    /// Size parameter $x = 2\pi n_m a / \lambda$.
    size_parameter: f64,
    a: Vec<Complex64>,
    b: Vec<Complex64>,
}

impl MieCoefficients {
    /// Highest multipole order in the series.
    pub fn n_max(&self) -> usize {
        self.a.len()
    }

    pub fn size_parameter(&self) -> f64 {
        self.size_parameter
    }

    /// Coefficients $(a_n, b_n)$ for order `n` (1-based).
    ///
    /// # Panics
    /// Panics if `n == 0` or `n > n_max()`.
    pub fn order(&self, n: usize) -> (Complex64, Complex64) {
        assert!(n >= 1 && n <= self.n_max(), "Multipole order {} out of range", n);
        (self.a[n - 1], self.b[n - 1])
    }

    /// Iterate over `(n, a_n, b_n)` in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Complex64, Complex64)> + '_ {
        self.a
            .iter()
            .zip(self.b.iter())
            .enumerate()
            .map(|(i, (&a, &b))| (i + 1, a, b))
    }

    /// Extinction efficiency
    /// $Q_{\text{ext}} = \frac{2}{x^2}\sum_n (2n+1)\,\mathrm{Re}(a_n + b_n)$.
    pub fn extinction_efficiency(&self) -> f64 {
        let x = self.size_parameter;
        let sum: f64 = self
            .iter()
            .map(|(n, a, b)| (2 * n + 1) as f64 * (a + b).re)
            .sum();
        2.0 * sum / (x * x)
    }

    /// Scattering efficiency
    /// $Q_{\text{sca}} = \frac{2}{x^2}\sum_n (2n+1)(|a_n|^2 + |b_n|^2)$.
    pub fn scattering_efficiency(&self) -> f64 {
        let x = self.size_parameter;
        let sum: f64 = self
            .iter()
            .map(|(n, a, b)| (2 * n + 1) as f64 * (a.norm_sqr() + b.norm_sqr()))
            .sum();
        2.0 * sum / (x * x)
    }
}

/// Compute the Mie coefficients of a homogeneous sphere.
///
/// # Arguments
/// * `radius` - Sphere radius (µm).
/// * `n_particle` - Complex refractive index of the sphere.
/// * `n_medium` - Refractive index of the surrounding medium (real).
/// * `wavelength` - Vacuum wavelength of the illumination (µm).
pub fn mie_coefficients(
    radius: f64,
    n_particle: Complex64,
    n_medium: f64,
    wavelength: f64,
) -> Result<MieCoefficients, MieError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MieError::InvalidRadius(radius));
    }
    if !(wavelength.is_finite() && wavelength > 0.0) {
        return Err(MieError::InvalidWavelength(wavelength));
    }
    if !(n_medium.is_finite() && n_medium > 0.0) {
        return Err(MieError::InvalidIndex {
            which: "medium",
            value: n_medium,
        });
    }
    if !(n_particle.re.is_finite() && n_particle.im.is_finite() && n_particle.re > 0.0) {
        return Err(MieError::InvalidIndex {
            which: "particle",
            value: n_particle.re,
        });
    }

    let x = 2.0 * std::f64::consts::PI * n_medium * radius / wavelength;
    let m = n_particle / n_medium;
    let (a, b) = coefficient_series(x, m);

    Ok(MieCoefficients {
        size_parameter: x,
        a,
        b,
    })
}

/// Wiscombe's truncation order.
fn series_length(x: f64) -> usize {
    (x + 4.05 * x.cbrt() + 2.0).floor().max(1.0) as usize
}

/// Compute $a_n$, $b_n$ for size parameter `x` and relative index `m`.
fn coefficient_series(x: f64, m: Complex64) -> (Vec<Complex64>, Vec<Complex64>) {
    let n_stop = series_length(x);
    let mx = m * x;

    // Logarithmic derivative D_n(mx) by downward recurrence, started well
    // above n_stop so the seed error has decayed by n = n_stop.
    let n_mx = n_stop.max(mx.norm().ceil() as usize) + 15;
    let mut d = vec![Complex64::new(0.0, 0.0); n_mx + 1];
    for n in (1..=n_mx).rev() {
        let rn = Complex64::new(n as f64, 0.0) / mx;
        d[n - 1] = rn - 1.0 / (d[n] + rn);
    }

    // Riccati-Bessel functions: psi_{-1} = cos x, psi_0 = sin x,
    // chi_{-1} = -sin x, chi_0 = cos x, xi_n = psi_n - i chi_n.
    let (sin_x, cos_x) = x.sin_cos();
    let mut psi_prev = cos_x;
    let mut psi_curr = sin_x;
    let mut chi_prev = -sin_x;
    let mut chi_curr = cos_x;
    let mut xi_curr = Complex64::new(psi_curr, -chi_curr);

    let mut a = Vec::with_capacity(n_stop);
    let mut b = Vec::with_capacity(n_stop);

    for n in 1..=n_stop {
        let nf = n as f64;
        let psi = (2.0 * nf - 1.0) * psi_curr / x - psi_prev;
        let chi = (2.0 * nf - 1.0) * chi_curr / x - chi_prev;
        let xi = Complex64::new(psi, -chi);

        let da = d[n] / m + nf / x;
        let db = d[n] * m + nf / x;
        a.push((da * psi - psi_curr) / (da * xi - xi_curr));
        b.push((db * psi - psi_curr) / (db * xi - xi_curr));

        psi_prev = psi_curr;
        psi_curr = psi;
        chi_prev = chi_curr;
        chi_curr = chi;
        xi_curr = xi;
    }

    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lossless_sphere_conserves_energy() {
        // Polystyrene-like bead in water at 447 nm.
        let ab = mie_coefficients(0.5, Complex64::new(1.5, 0.0), 1.339, 0.447).unwrap();
        let q_ext = ab.extinction_efficiency();
        let q_sca = ab.scattering_efficiency();
        assert!(q_ext > 0.0);
        assert_relative_eq!(q_ext, q_sca, max_relative = 1e-9);
    }

    #[test]
    fn test_rayleigh_limit_of_first_electric_coefficient() {
        let radius = 0.002;
        let wavelength = 0.5;
        let m = Complex64::new(1.5, 0.0);
        let ab = mie_coefficients(radius, m, 1.0, wavelength).unwrap();
        let x = ab.size_parameter();

        let m2 = m * m;
        let expected = Complex64::new(0.0, -2.0 / 3.0) * x.powi(3) * (m2 - 1.0) / (m2 + 2.0);
        let (a1, b1) = ab.order(1);

        assert_relative_eq!(a1.im, expected.im, max_relative = 1e-3);
        assert!(a1.re.abs() < 1e-3 * a1.im.abs());
        assert!(b1.norm() < 1e-2 * a1.norm());
    }

    #[test]
    fn test_absorbing_sphere_extinguishes_more_than_it_scatters() {
        let ab = mie_coefficients(0.05, Complex64::new(0.2, 3.0), 1.33, 0.55).unwrap();
        assert!(ab.extinction_efficiency() > ab.scattering_efficiency());
    }

    #[test]
    fn test_series_length_tracks_size_parameter() {
        let small = mie_coefficients(0.1, Complex64::new(1.5, 0.0), 1.0, 0.5).unwrap();
        let large = mie_coefficients(2.0, Complex64::new(1.5, 0.0), 1.0, 0.5).unwrap();
        assert!(large.n_max() > small.n_max());
        assert_eq!(large.n_max(), series_length(large.size_parameter()));
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let n_p = Complex64::new(1.5, 0.0);
        assert!(matches!(mie_coefficients(0.0, n_p, 1.0, 0.5), Err(MieError::InvalidRadius(_))));
        assert!(matches!(
            mie_coefficients(0.5, n_p, 1.0, -1.0),
            Err(MieError::InvalidWavelength(_))
        ));
        assert!(matches!(
            mie_coefficients(0.5, n_p, f64::NAN, 0.5),
            Err(MieError::InvalidIndex { which: "medium", .. })
        ));
    }
}
