//! Property-based tests for the pipeline stages using proptest.

use dwscope_core::pipeline::{
    collection, discretize_plan, displace, displacement, image_formation, propagate_plane_wave,
    scatter, PUPIL_RADIUS,
};
use dwscope_core::{OpticalSystem, Sphere};
use dwscope_geometry::{Grid, VectorField};
use ndarray::Array3;
use num_complex::Complex64;
use proptest::prelude::*;

fn complex_field(dim: (usize, usize), values: &[(f64, f64)]) -> VectorField {
    let (p, q) = dim;
    let data = Array3::from_shape_fn((3, p, q), |(c, i, j)| {
        let (re, im) = values[(c * p * q + i * q + j) % values.len()];
        Complex64::new(re, im)
    });
    VectorField::from_array(data).unwrap()
}

proptest! {
    /// Intensity is never negative, whatever the complex fields.
    #[test]
    fn image_is_nonnegative(
        p in 1usize..8,
        q in 1usize..8,
        scattered in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..64),
        incident in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..64),
    ) {
        let es = complex_field((p, q), &scattered);
        let e_inc = complex_field((p, q), &incident);
        let image = image_formation(&es, &e_inc).unwrap();
        prop_assert_eq!(image.dim(), (p, q));
        prop_assert!(image.iter().all(|&v| v >= 0.0));
    }

    /// The displacement phase has unit modulus on propagating directions and
    /// vanishes on evanescent ones.
    #[test]
    fn displacement_modulus(
        n in 3usize..40,
        scale in 0.01f64..0.2,
        z in -500.0f64..500.0,
        k in 0.1f64..10.0,
    ) {
        let grid = Grid::centered(n, n, [scale, scale]);
        let disp = displacement(&grid, z, k);
        for ((i, j), v) in disp.indexed_iter() {
            let sx = grid.first_axis()[[i, j]];
            let sy = grid.second_axis()[[i, j]];
            if sx * sx + sy * sy < 1.0 {
                prop_assert!((v.norm() - 1.0).abs() < 1e-12);
            } else {
                prop_assert_eq!(v.norm(), 0.0);
            }
        }
    }

    /// Displacement leaves the radial component untouched.
    #[test]
    fn displacement_skips_radial_component(
        n in 3usize..16,
        z in -100.0f64..100.0,
        values in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..32),
    ) {
        let grid = Grid::centered(n, n, [0.1, 0.1]);
        let field = complex_field((n, n), &values);
        let moved = displace(&field, &displacement(&grid, z, 2.5)).unwrap();
        prop_assert_eq!(moved.component(0), field.component(0));
    }

    /// The plane wave is x-polarised with amplitude |A|.
    #[test]
    fn plane_wave_is_uniform(
        amplitude in -2.0f64..2.0,
        k in 0.1f64..10.0,
        path in -100.0f64..100.0,
    ) {
        let e_inc = propagate_plane_wave(amplitude, k, path, (4, 3));
        prop_assert!(e_inc.component(0).iter().all(|v| (v.norm() - amplitude.abs()).abs() < 1e-12));
        prop_assert!(e_inc.component(1).iter().all(|v| v.norm() == 0.0));
        prop_assert!(e_inc.component(2).iter().all(|v| v.norm() == 0.0));
    }

    /// A higher NA never shrinks the pupil grid.
    #[test]
    fn plan_grows_with_na(na in 0.1f64..1.0, extra in 0.01f64..0.4) {
        let low = discretize_plan(na, 100.0, 0.447, 1.0, 0.135).unwrap();
        let high = discretize_plan(na + extra, 100.0, 0.447, 1.0, 0.135).unwrap();
        prop_assert!(high.p >= low.p);
        prop_assert_eq!(low.p, low.q);
        prop_assert_eq!(discretize_plan(na, 100.0, 0.447, 1.0, 0.135).unwrap(), low);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Scattering into a pupil and collecting it with unit magnification on
    /// the same geometry only flips the sign of the angular spectrum.
    #[test]
    fn scatter_then_unit_collection_negates(
        n in 3usize..16,
        scale in 0.02f64..0.2,
        radius in 0.1f64..1.0,
        index in 1.35f64..1.8,
    ) {
        let grid = Grid::centered(n, n, [scale, scale]);
        let geometry = grid.acquire_spherical(1.0).unwrap();
        let ang_spec = scatter(&grid, &Sphere::new(radius, index), &OpticalSystem::default(), PUPIL_RADIUS)
            .unwrap();
        let collected = collection(&ang_spec, &geometry, &grid, &geometry, 1.0, None).unwrap();

        prop_assert_eq!(collected.dim(), ang_spec.dim());
        for (a, b) in collected.as_array().iter().zip(ang_spec.as_array().iter()) {
            prop_assert_eq!(*a, -*b);
        }
    }
}
