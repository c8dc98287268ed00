//! Scattered field of a sphere from its Mie coefficients.
//!
//! For an incident plane wave travelling along $+\hat z$ and polarised along
//! $\hat x$, the scattered field at $\mathbf{r}$ relative to the sphere centre
//! is the vector spherical harmonic series
//!
//! $$
//! \mathbf{E}_s = \sum_{n=1}^{n_{\max}} E_n \bigl(i a_n \mathbf{N}_{e1n} - b_n \mathbf{M}_{o1n}\bigr),
//! \qquad E_n = i^n \frac{2n+1}{n(n+1)}
//! $$
//!
//! (Bohren & Huffman Eq. 4.45). Angular functions use Wiscombe's upward
//! recurrences and the radial dependence the outgoing Riccati-Hankel
//! function $\xi_n(kr)$.

use ndarray::{Array2, ArrayView1, Zip};
use num_complex::Complex64;

use crate::mie::MieCoefficients;

/// Vector basis of the returned field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// $(\hat r, \hat\theta, \hat\phi)$ centred on the sphere.
    Spherical,
    /// $(\hat x, \hat y, \hat z)$.
    Cartesian,
}

/// Quantity returned by [`spherical_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// The scattered electric field itself.
    Field,
    /// The far-field strength factor $\mathbf{A} = \mathbf{E}_s\, r\, e^{-ikr}$,
    /// i.e. the field with its outgoing spherical-wave dependence removed.
    StrengthFactor,
}

/// Evaluate the scattered field at a set of points.
///
/// # Arguments
/// * `x`, `y`, `z` - Point coordinates relative to the sphere centre, in the
///   same length unit as `wavelength`. All three must have equal length.
/// * `coefficients` - Mie coefficients of the sphere.
/// * `wavelength` - Wavelength in the medium.
/// * `basis` - Vector basis of the output.
/// * `mode` - Field or strength factor.
///
/// # Returns
/// Array of shape `(3, N)`.
///
/// # Panics
/// Panics if the coordinate slices have different lengths.
pub fn spherical_field(
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
    z: ArrayView1<'_, f64>,
    coefficients: &MieCoefficients,
    wavelength: f64,
    basis: Basis,
    mode: FieldMode,
) -> Array2<Complex64> {
    assert!(
        x.len() == y.len() && y.len() == z.len(),
        "Coordinate arrays must have equal length"
    );

    let k = 2.0 * std::f64::consts::PI / wavelength;
    let mut field = Array2::<Complex64>::zeros((3, x.len()));

    Zip::from(field.columns_mut())
        .and(&x)
        .and(&y)
        .and(&z)
        .for_each(|mut column, &x, &y, &z| {
            let e = field_at_point(x, y, z, coefficients, k, basis, mode);
            for c in 0..3 {
                column[c] = e[c];
            }
        });

    field
}

fn field_at_point(
    x: f64,
    y: f64,
    z: f64,
    coefficients: &MieCoefficients,
    k: f64,
    basis: Basis,
    mode: FieldMode,
) -> [Complex64; 3] {
    let ci = Complex64::i();

    let rho = x.hypot(y);
    let r = rho.hypot(z);
    let theta = rho.atan2(z);
    let phi = y.atan2(x);
    let (sintheta, costheta) = theta.sin_cos();
    let (sinphi, cosphi) = phi.sin_cos();

    let kr = k * r;

    // Riccati-Hankel seeds: xi_{-1}(kr), xi_0(kr).
    let (sinkr, coskr) = kr.sin_cos();
    let mut xi_nm2 = Complex64::new(coskr, sinkr);
    let mut xi_nm1 = Complex64::new(sinkr, -coskr);

    // Angular seeds: pi_0 = 0, pi_1 = 1.
    let mut pi_nm1 = 0.0;
    let mut pi_n = 1.0;

    let mut es = [Complex64::new(0.0, 0.0); 3];

    for (n, a_n, b_n) in coefficients.iter() {
        let nf = n as f64;

        // Wiscombe's recurrence; tau_n carries its minus sign.
        let swisc = pi_n * costheta;
        let twisc = swisc - pi_nm1;
        let tau_n = pi_nm1 - nf * twisc;

        let xi_n = (2.0 * nf - 1.0) * xi_nm1 / kr - xi_nm2;

        // Vector spherical harmonics with the geometric factors
        // cos(phi)/kr, sin(phi)/kr, cos(phi) sin(theta)/kr^2 divided out.
        let mo1n = [Complex64::new(0.0, 0.0), pi_n * xi_n, tau_n * xi_n];
        let dn = nf * xi_n / kr - xi_nm1;
        let ne1n = [nf * (nf + 1.0) * pi_n * xi_n, tau_n * dn, pi_n * dn];

        let en = ci.powu(n as u32) * (2.0 * nf + 1.0) / (nf * (nf + 1.0));
        for c in 0..3 {
            es[c] += en * (ci * a_n * ne1n[c] - b_n * mo1n[c]);
        }

        pi_nm1 = pi_n;
        pi_n = swisc + ((nf + 1.0) / nf) * twisc;

        xi_nm2 = xi_nm1;
        xi_nm1 = xi_n;
    }

    es[0] *= cosphi * sintheta / (kr * kr);
    es[1] *= cosphi / kr;
    es[2] *= sinphi / kr;

    if mode == FieldMode::StrengthFactor {
        let factor = r * Complex64::new(0.0, -kr).exp();
        for e in es.iter_mut() {
            *e *= factor;
        }
    }

    match basis {
        Basis::Spherical => es,
        Basis::Cartesian => [
            sintheta * cosphi * es[0] + costheta * cosphi * es[1] - sinphi * es[2],
            sintheta * sinphi * es[0] + costheta * sinphi * es[1] + cosphi * es[2],
            costheta * es[0] - sintheta * es[1],
        ],
    }
}
