//! Covariance-based features.
//!
//! Each epoch is reduced to the vectorized upper triangle of its channel
//! covariance matrix. The diagonal is scaled by √2 before vectorization so
//! the Euclidean norm of the vector equals the Frobenius norm of the full
//! symmetric matrix (off-diagonal entries already count twice there).
use ndarray::{Array1, Array2, ArrayView2, Axis};

use super::FeatureExtractor;

/// Second-order statistic extractor: vectorized channel covariance.
///
/// For `C` channels the feature vector has length `C·(C+1)/2`, independent
/// of epoch duration.
pub struct CovarianceExtractor;

impl FeatureExtractor for CovarianceExtractor {
    fn extract(epoch: ArrayView2<'_, f64>, _sample_rate: Option<usize>) -> Array1<f64> {
        let mut cov = covariance(epoch);
        let n_ch = cov.nrows();

        for i in 0..n_ch {
            cov[[i, i]] *= std::f64::consts::SQRT_2;
        }

        // Upper triangle (row ≤ col), row-major.
        let mut features = Array1::zeros(n_ch * (n_ch + 1) / 2);
        let mut k = 0;
        for i in 0..n_ch {
            for j in i..n_ch {
                features[k] = cov[[i, j]];
                k += 1;
            }
        }
        features
    }
}

/// Unbiased sample covariance of `signal` ([C, T]): channels are variables,
/// time samples are observations, divisor `T − 1`.
pub fn covariance(signal: ArrayView2<'_, f64>) -> Array2<f64> {
    let n_t = signal.ncols();
    let means = signal.sum_axis(Axis(1)) / n_t as f64;
    let centered = &signal - &means.insert_axis(Axis(1));
    centered.dot(&centered.t()) / (n_t as f64 - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    #[test]
    fn covariance_matches_hand_computation() {
        // x0 = [1,2,3,4], x1 = 2·x0: var(x0)=5/3, cov=10/3, var(x1)=20/3.
        let sig = array![[1.0, 2.0, 3.0, 4.0], [2.0, 4.0, 6.0, 8.0]];
        let cov = covariance(sig.view());
        approx::assert_abs_diff_eq!(cov[[0, 0]], 5.0 / 3.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(cov[[0, 1]], 10.0 / 3.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(cov[[1, 0]], 10.0 / 3.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(cov[[1, 1]], 20.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn feature_length_is_triangular_number() {
        for n_ch in [1usize, 2, 4, 18] {
            let sig = Array2::from_shape_fn((n_ch, 64), |(c, t)| ((c * 31 + t * 7) as f64).sin());
            let f = CovarianceExtractor::extract(sig.view(), None);
            assert_eq!(f.len(), n_ch * (n_ch + 1) / 2);
        }
    }

    #[test]
    fn diagonal_entries_carry_sqrt2() {
        let sig = array![[1.0, 2.0, 3.0, 4.0], [2.0, 4.0, 6.0, 8.0]];
        let f = CovarianceExtractor::extract(sig.view(), None);
        let sqrt2 = std::f64::consts::SQRT_2;
        approx::assert_abs_diff_eq!(f[0], sqrt2 * 5.0 / 3.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(f[1], 10.0 / 3.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(f[2], sqrt2 * 20.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn sample_rate_is_ignored() {
        let sig = Array2::from_shape_fn((3, 128), |(c, t)| ((c + t) as f64).cos());
        let a = CovarianceExtractor::extract(sig.view(), None);
        let b = CovarianceExtractor::extract(sig.view(), Some(256));
        assert_eq!(a, b);
    }

    #[test]
    fn batch_preserves_order() {
        let batch = Array3::from_shape_fn((5, 3, 64), |(e, c, t)| {
            (e as f64 + 1.0) * ((c * 13 + t) as f64).sin()
        });
        let all = CovarianceExtractor::extract_all(batch.outer_iter(), None);
        assert_eq!(all.dim(), (5, 6));
        for e in 0..5 {
            let single = CovarianceExtractor::extract(batch.index_axis(Axis(0), e), None);
            assert_eq!(all.row(e).to_owned(), single);
        }
    }

    #[test]
    fn empty_batch_yields_empty_matrix() {
        let all = CovarianceExtractor::extract_all(std::iter::empty(), None);
        assert_eq!(all.dim(), (0, 0));
    }
}
