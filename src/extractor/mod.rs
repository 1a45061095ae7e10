//! Epoch-level feature extraction.
//!
//! An extractor is a capability: one pure function mapping a multi-channel
//! epoch to a feature vector. The batch form is derived from it, so every
//! implementor gets [`FeatureExtractor::extract_all`] for free.
mod covariance;

pub use covariance::{covariance, CovarianceExtractor};

use ndarray::{Array1, Array2, ArrayView2};

/// Interface for epoch-level feature extractors.
///
/// Implementors provide [`extract`](Self::extract); the batch operation is
/// provided in terms of it. Both are associated functions: extractors are
/// stateless, and variants substitute via the type parameter at the call
/// site (`CovarianceExtractor::extract_all(...)`).
pub trait FeatureExtractor {
    /// Map one epoch of shape `[C, T]` to a feature vector.
    ///
    /// `sample_rate` is part of the interface so rate-dependent variants
    /// (spectral power, band ratios) can be substituted without changing
    /// callers; time-domain extractors ignore it.
    fn extract(epoch: ArrayView2<'_, f64>, sample_rate: Option<usize>) -> Array1<f64>;

    /// Apply [`extract`](Self::extract) to every epoch in input order and
    /// stack the results into an `[E, n_features]` matrix.
    ///
    /// Accepts anything yielding 2-D epoch views: an explicit collection,
    /// or a 3-D batch via [`outer_iter`](ndarray::Array3::outer_iter).
    /// An empty input yields a `[0, 0]` matrix.
    fn extract_all<'a, I>(epochs: I, sample_rate: Option<usize>) -> Array2<f64>
    where
        I: IntoIterator<Item = ArrayView2<'a, f64>>,
    {
        let rows: Vec<Array1<f64>> = epochs
            .into_iter()
            .map(|epoch| Self::extract(epoch, sample_rate))
            .collect();

        let Some(first) = rows.first() else {
            return Array2::zeros((0, 0));
        };

        let mut out = Array2::zeros((rows.len(), first.len()));
        for (i, row) in rows.iter().enumerate() {
            out.row_mut(i).assign(row);
        }
        out
    }
}
