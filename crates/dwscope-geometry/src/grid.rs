//! Rectangular coordinate grids.
//!
//! A [`Grid`] is a P×Q lattice whose point (i, j) sits at
//!
//! $$ (x_{ij}, y_{ij}) = \bigl((i - o_0)\,s_0,\; (j - o_1)\,s_1\bigr) $$
//!
//! where $o$ is the origin (in lattice units) and $s$ the per-axis scale.
//! The first coordinate array varies along axis 0 and the second along
//! axis 1, so both have shape `(P, Q)` and index exactly like the fields
//! sampled on them.

use ndarray::Array2;

use crate::spherical::SphericalGeometry;
use crate::GeometryError;

/// An immutable 2-D lattice of physical coordinates.
#[derive(Debug, Clone)]
pub struct Grid {
    origin: [f64; 2],
    scale: [f64; 2],
    first: Array2<f64>,
    second: Array2<f64>,
}

impl Grid {
    /// Build a `p × q` grid with the given origin and scale.
    ///
    /// # Arguments
    /// * `p`, `q` - Number of lattice points along axis 0 and axis 1.
    /// * `origin` - Lattice position mapped to the physical origin.
    /// * `scale` - Physical spacing between neighbouring points per axis.
    pub fn new(p: usize, q: usize, origin: [f64; 2], scale: [f64; 2]) -> Self {
        let first = Array2::from_shape_fn((p, q), |(i, _)| (i as f64 - origin[0]) * scale[0]);
        let second = Array2::from_shape_fn((p, q), |(_, j)| (j as f64 - origin[1]) * scale[1]);

        Self {
            origin,
            scale,
            first,
            second,
        }
    }

    /// Grid whose origin is the geometric centre, `((p-1)/2, (q-1)/2)`.
    pub fn centered(p: usize, q: usize, scale: [f64; 2]) -> Self {
        Self::new(p, q, centre_of(p, q), scale)
    }

    /// Centred grid with unit scale: coordinates are centred pixel indices.
    pub fn centered_indices(p: usize, q: usize) -> Self {
        Self::centered(p, q, [1.0, 1.0])
    }

    /// Number of lattice points along each axis.
    pub fn dim(&self) -> (usize, usize) {
        self.first.dim()
    }

    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    pub fn scale(&self) -> [f64; 2] {
        self.scale
    }

    /// Coordinates along the first axis, shape `(P, Q)`.
    pub fn first_axis(&self) -> &Array2<f64> {
        &self.first
    }

    /// Coordinates along the second axis, shape `(P, Q)`.
    pub fn second_axis(&self) -> &Array2<f64> {
        &self.second
    }

    /// Squared in-plane radius $x^2 + y^2$ of every lattice point.
    pub fn radius_sq(&self) -> Array2<f64> {
        &self.first * &self.first + &self.second * &self.second
    }

    /// Derive polar/azimuthal angles treating each point as the projection
    /// of a direction on a sphere of the given reference radius.
    ///
    /// Points with normalised in-plane radius ≥ 1 are masked (see
    /// [`SphericalGeometry`]).
    pub fn acquire_spherical(&self, radius: f64) -> Result<SphericalGeometry, GeometryError> {
        SphericalGeometry::from_grid(self, radius)
    }
}

fn centre_of(p: usize, q: usize) -> [f64; 2] {
    [0.5 * (p as f64 - 1.0), 0.5 * (q as f64 - 1.0)]
}
