//! Intensity image from superposed scattered and incident fields.

use dwscope_geometry::VectorField;
use ndarray::Array2;

use super::ImagingError;

/// Camera intensity $I = \sum_c |E_{s,c} + E_{inc,c}|^2$.
///
/// Both fields must share the same `(Np, Nq)` shape.
pub fn image_formation(es_cam: &VectorField, e_inc: &VectorField) -> Result<Array2<f64>, ImagingError> {
    let total = es_cam.add(e_inc)?;
    let data = total.as_array();

    let mut image = Array2::zeros(total.dim());
    for component in data.outer_iter() {
        image.zip_mut_with(&component, |i: &mut f64, e| *i += e.norm_sqr());
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_plane_wave_alone_is_uniform() {
        let es = VectorField::zeros((4, 5));
        let mut e_inc = VectorField::zeros((4, 5));
        e_inc.component_mut(0).fill(Complex64::new(0.0, -0.01));

        let image = image_formation(&es, &e_inc).unwrap();
        assert_eq!(image.dim(), (4, 5));
        for &v in image.iter() {
            assert_relative_eq!(v, 1e-4, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_components_add_incoherently() {
        let mut es = VectorField::zeros((2, 2));
        es.component_mut(1).fill(Complex64::new(3.0, 0.0));
        es.component_mut(2).fill(Complex64::new(0.0, 4.0));
        let mut e_inc = VectorField::zeros((2, 2));
        e_inc.component_mut(0).fill(Complex64::new(1.0, 0.0));

        let image = image_formation(&es, &e_inc).unwrap();
        for &v in image.iter() {
            assert_relative_eq!(v, 26.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_destructive_interference_cancels() {
        let mut es = VectorField::zeros((3, 3));
        es.component_mut(0).fill(Complex64::new(0.5, -0.5));
        let mut e_inc = VectorField::zeros((3, 3));
        e_inc.component_mut(0).fill(Complex64::new(-0.5, 0.5));

        let image = image_formation(&es, &e_inc).unwrap();
        assert!(image.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let es = VectorField::zeros((3, 3));
        let e_inc = VectorField::zeros((3, 4));
        assert!(matches!(
            image_formation(&es, &e_inc),
            Err(ImagingError::Geometry(_))
        ));
    }
}
