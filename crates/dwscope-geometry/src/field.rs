//! Three-component complex vector fields on a grid.
//!
//! A [`VectorField`] stores an array of shape `(3, P, Q)`. Component 0 is the
//! radial (spherical basis) or x (cartesian basis) component; components 1
//! and 2 are θ, φ or y, z. The basis is not recorded on the value: the stage
//! that produced the field determines it.

use ndarray::{Array2, Array3, ArrayView2, ArrayViewMut2, Axis};
use num_complex::Complex64;

use crate::spherical::SphericalGeometry;
use crate::GeometryError;

/// A complex vector field sampled on a P×Q grid.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    data: Array3<Complex64>,
}

impl VectorField {
    /// All-zero field of the given grid shape.
    pub fn zeros(dim: (usize, usize)) -> Self {
        Self {
            data: Array3::zeros((3, dim.0, dim.1)),
        }
    }

    /// Wrap a `(3, P, Q)` array.
    pub fn from_array(data: Array3<Complex64>) -> Result<Self, GeometryError> {
        if data.len_of(Axis(0)) != 3 {
            return Err(GeometryError::ShapeMismatch {
                expected: vec![3, data.len_of(Axis(1)), data.len_of(Axis(2))],
                found: data.shape().to_vec(),
            });
        }
        Ok(Self { data })
    }

    /// Grid shape `(P, Q)`.
    pub fn dim(&self) -> (usize, usize) {
        let (_, p, q) = self.data.dim();
        (p, q)
    }

    pub fn component(&self, index: usize) -> ArrayView2<'_, Complex64> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn component_mut(&mut self, index: usize) -> ArrayViewMut2<'_, Complex64> {
        self.data.index_axis_mut(Axis(0), index)
    }

    pub fn as_array(&self) -> &Array3<Complex64> {
        &self.data
    }

    pub fn into_array(self) -> Array3<Complex64> {
        self.data
    }

    /// Multiply every component pointwise by `factor`.
    pub fn scaled_by(&self, factor: &Array2<Complex64>) -> Result<Self, GeometryError> {
        self.check_dim(factor.dim())?;
        let mut data = self.data.clone();
        for mut component in data.outer_iter_mut() {
            component *= factor;
        }
        Ok(Self { data })
    }

    /// Pointwise sum of two fields.
    pub fn add(&self, other: &VectorField) -> Result<Self, GeometryError> {
        self.check_dim(other.dim())?;
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    /// Largest modulus over all components and points.
    pub fn max_norm(&self) -> f64 {
        self.data.iter().map(|c| c.norm()).fold(0.0, f64::max)
    }

    pub(crate) fn check_dim(&self, dim: (usize, usize)) -> Result<(), GeometryError> {
        if self.dim() != dim {
            let (p, q) = self.dim();
            return Err(GeometryError::ShapeMismatch {
                expected: vec![p, q],
                found: vec![dim.0, dim.1],
            });
        }
        Ok(())
    }
}

/// Project a field from the spherical basis $(\hat r, \hat\theta, \hat\phi)$
/// onto the cartesian basis $(\hat x, \hat y, \hat z)$ using the angles of
/// `geometry`:
///
/// $$
/// \begin{aligned}
/// E_x &= \sin\theta\cos\phi\,E_r + \cos\theta\cos\phi\,E_\theta - \sin\phi\,E_\phi \\
/// E_y &= \sin\theta\sin\phi\,E_r + \cos\theta\sin\phi\,E_\theta + \cos\phi\,E_\phi \\
/// E_z &= \cos\theta\,E_r - \sin\theta\,E_\theta
/// \end{aligned}
/// $$
pub fn spherical_to_cartesian(
    field: &VectorField,
    geometry: &SphericalGeometry,
) -> Result<VectorField, GeometryError> {
    field.check_dim(geometry.dim())?;

    let (e_r, e_t, e_p) = (field.component(0), field.component(1), field.component(2));
    let (ct, st) = (geometry.costheta(), geometry.sintheta());
    let (cp, sp) = (geometry.cosphi(), geometry.sinphi());

    let mut out = VectorField::zeros(field.dim());
    for ((i, j), &er) in e_r.indexed_iter() {
        let (et, ep) = (e_t[[i, j]], e_p[[i, j]]);
        let (ct, st, cp, sp) = (ct[[i, j]], st[[i, j]], cp[[i, j]], sp[[i, j]]);

        out.data[[0, i, j]] = er * (st * cp) + et * (ct * cp) - ep * sp;
        out.data[[1, i, j]] = er * (st * sp) + et * (ct * sp) + ep * cp;
        out.data[[2, i, j]] = er * ct - et * st;
    }

    Ok(out)
}
