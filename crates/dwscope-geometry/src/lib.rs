//! # dwscope Geometry
//!
//! Coordinate handling for the dwscope imaging pipeline. This crate provides:
//!
//! - **Grids** ([`grid`]): Rectangular lattices with an origin and per-axis
//!   scale, used for the object-side and image-side direction-cosine planes
//!   and for the padded camera-plane index grid.
//! - **Spherical geometry** ([`spherical`]): Polar and azimuthal angles of
//!   each grid direction, masked to the propagating disk.
//! - **Vector fields** ([`field`]): Three-component complex fields sampled on
//!   a grid, and conversion from the spherical to the cartesian basis.

pub mod field;
pub mod grid;
pub mod spherical;

pub use field::{spherical_to_cartesian, VectorField};
pub use grid::Grid;
pub use spherical::SphericalGeometry;

use thiserror::Error;

/// Errors raised while building or combining geometries.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Reference radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}
