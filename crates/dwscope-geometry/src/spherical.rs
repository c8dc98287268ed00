//! Spherical angles of grid directions.
//!
//! Each grid point $(x, y)$ is read as the transverse projection of a point
//! on a sphere of radius $R$, i.e. direction cosines $s_x = x/R$,
//! $s_y = y/R$. Only the open disk $s_x^2 + s_y^2 < 1$ corresponds to
//! propagating directions; evanescent points are masked with
//! $\cos\theta = \sin\theta = 0$ so downstream stages return zeros there
//! instead of failing.

use ndarray::Array2;

use crate::grid::Grid;
use crate::GeometryError;

/// Polar and azimuthal angles of every point of a [`Grid`].
#[derive(Debug, Clone)]
pub struct SphericalGeometry {
    radius: f64,
    inside: Array2<bool>,
    costheta: Array2<f64>,
    sintheta: Array2<f64>,
    cosphi: Array2<f64>,
    sinphi: Array2<f64>,
}

impl SphericalGeometry {
    /// Derive the geometry of `grid` for reference radius `radius`.
    pub fn from_grid(grid: &Grid, radius: f64) -> Result<Self, GeometryError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::InvalidRadius(radius));
        }

        let dim = grid.dim();
        let mut inside = Array2::from_elem(dim, false);
        let mut costheta = Array2::zeros(dim);
        let mut sintheta = Array2::zeros(dim);
        let mut cosphi = Array2::zeros(dim);
        let mut sinphi = Array2::zeros(dim);

        let x = grid.first_axis();
        let y = grid.second_axis();
        for ((i, j), &xi) in x.indexed_iter() {
            let yi = y[[i, j]];
            let phi = yi.atan2(xi);
            cosphi[[i, j]] = phi.cos();
            sinphi[[i, j]] = phi.sin();

            let sx = xi / radius;
            let sy = yi / radius;
            let rho_sq = sx * sx + sy * sy;
            if rho_sq < 1.0 {
                inside[[i, j]] = true;
                costheta[[i, j]] = (1.0 - rho_sq).sqrt();
                sintheta[[i, j]] = rho_sq.sqrt();
            }
        }

        Ok(Self {
            radius,
            inside,
            costheta,
            sintheta,
            cosphi,
            sinphi,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn dim(&self) -> (usize, usize) {
        self.costheta.dim()
    }

    /// `true` where the direction is propagating ($s_x^2 + s_y^2 < 1$).
    pub fn inside(&self) -> &Array2<bool> {
        &self.inside
    }

    /// $\cos\theta$; zero outside the propagating disk.
    pub fn costheta(&self) -> &Array2<f64> {
        &self.costheta
    }

    /// $\sin\theta$; zero outside the propagating disk.
    pub fn sintheta(&self) -> &Array2<f64> {
        &self.sintheta
    }

    pub fn cosphi(&self) -> &Array2<f64> {
        &self.cosphi
    }

    pub fn sinphi(&self) -> &Array2<f64> {
        &self.sinphi
    }
}
