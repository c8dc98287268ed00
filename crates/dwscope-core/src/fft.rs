//! 2-D FFT helpers around rustfft.
//!
//! Conventions match numpy:
//! - [`fft2_padded`] is unnormalised and zero-pads at the high-index end,
//!   like `numpy.fft.fft2(a, s=(n0, n1))`.
//! - [`fftshift`] moves the zero-frequency bin from index 0 to `n / 2` on
//!   each axis, like `numpy.fft.fftshift`.

use ndarray::{s, Array2, ArrayView2, ArrayViewMut1};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Forward 2-D FFT of `input`, zero-padded to `shape`.
///
/// # Panics
/// Panics if `shape` is smaller than the input along either axis.
pub fn fft2_padded(input: ArrayView2<'_, Complex64>, shape: (usize, usize)) -> Array2<Complex64> {
    let (rows, cols) = input.dim();
    let (n0, n1) = shape;
    assert!(
        n0 >= rows && n1 >= cols,
        "Padded shape {:?} smaller than input {:?}",
        shape,
        input.dim()
    );

    let mut data = Array2::<Complex64>::zeros(shape);
    data.slice_mut(s![..rows, ..cols]).assign(&input);

    let mut planner = FftPlanner::new();

    // Along axis 1, then axis 0, each lane gathered into a scratch buffer.
    let fft_row = planner.plan_fft_forward(n1);
    let mut buffer = vec![Complex64::new(0.0, 0.0); n1];
    for row in data.rows_mut() {
        transform_lane(row, fft_row.as_ref(), &mut buffer);
    }

    let fft_col = planner.plan_fft_forward(n0);
    let mut buffer = vec![Complex64::new(0.0, 0.0); n0];
    for column in data.columns_mut() {
        transform_lane(column, fft_col.as_ref(), &mut buffer);
    }

    data
}

fn transform_lane(mut lane: ArrayViewMut1<'_, Complex64>, fft: &dyn Fft<f64>, buffer: &mut [Complex64]) {
    for (b, v) in buffer.iter_mut().zip(lane.iter()) {
        *b = *v;
    }
    fft.process(buffer);
    for (v, b) in lane.iter_mut().zip(buffer.iter()) {
        *v = *b;
    }
}

/// Circularly shift both axes so index 0 moves to `n / 2`.
pub fn fftshift<T: Clone>(input: ArrayView2<'_, T>) -> Array2<T> {
    let (n0, n1) = input.dim();
    let (h0, h1) = (n0 / 2, n1 / 2);
    Array2::from_shape_fn((n0, n1), |(i, j)| {
        input[[(i + n0 - h0) % n0, (j + n1 - h1) % n1]].clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_delta_transforms_to_constant() {
        let mut input = Array2::<Complex64>::zeros((3, 3));
        input[[0, 0]] = Complex64::new(2.0, 0.0);
        let spectrum = fft2_padded(input.view(), (8, 6));
        assert_eq!(spectrum.dim(), (8, 6));
        for v in spectrum.iter() {
            assert_relative_eq!(v.re, 2.0, epsilon = 1e-12);
            assert_relative_eq!(v.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dc_component_is_sum() {
        let input = Array2::from_shape_fn((4, 5), |(i, j)| Complex64::new(i as f64, j as f64));
        let spectrum = fft2_padded(input.view(), (7, 9));
        let sum: Complex64 = input.iter().sum();
        assert_relative_eq!(spectrum[[0, 0]].re, sum.re, epsilon = 1e-10);
        assert_relative_eq!(spectrum[[0, 0]].im, sum.im, epsilon = 1e-10);
    }

    #[test]
    fn test_matches_direct_dft() {
        let input = Array2::from_shape_fn((3, 2), |(i, j)| {
            Complex64::new((i * 2 + j) as f64, 1.0 - j as f64)
        });
        let (n0, n1) = (5, 4);
        let spectrum = fft2_padded(input.view(), (n0, n1));

        for u in 0..n0 {
            for v in 0..n1 {
                let mut expected = Complex64::new(0.0, 0.0);
                for ((i, j), &x) in input.indexed_iter() {
                    let arg = -2.0
                        * std::f64::consts::PI
                        * ((u * i) as f64 / n0 as f64 + (v * j) as f64 / n1 as f64);
                    expected += x * Complex64::new(0.0, arg).exp();
                }
                assert_relative_eq!(spectrum[[u, v]].re, expected.re, epsilon = 1e-10);
                assert_relative_eq!(spectrum[[u, v]].im, expected.im, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_fftshift_moves_origin_to_centre() {
        for &(n0, n1) in &[(4usize, 4usize), (5, 6), (7, 3)] {
            let mut input = Array2::<i32>::zeros((n0, n1));
            input[[0, 0]] = 1;
            let shifted = fftshift(input.view());
            assert_eq!(shifted[[n0 / 2, n1 / 2]], 1);
            assert_eq!(shifted.iter().sum::<i32>(), 1);
        }
    }
}
