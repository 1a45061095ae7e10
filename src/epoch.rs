//! Fixed-length epoching.
//!
//! Splits continuous [C, T] data into non-overlapping windows of
//! `epoch_dur` seconds, dropping any trailing incomplete window.
use log::warn;
use ndarray::{s, Array2, Array3};

/// Split `signal` ([C, T]) into a 3-D batch [E, C, epoch_size] where
/// `epoch_size = epoch_dur × sample_rate`.
///
/// Epochs are contiguous, non-overlapping and time-ordered; trailing
/// samples that don't fill a complete epoch are discarded. A signal shorter
/// than one epoch yields the empty batch `[0, C, epoch_size]`, a
/// recoverable condition logged as a warning, which callers treat as a
/// skip signal rather than a failure.
///
/// `epoch_dur × sample_rate` must be a whole number of samples; a
/// fractional product indicates a caller error and is truncated.
pub fn split_into_epochs(signal: &Array2<f64>, sample_rate: usize, epoch_dur: f64) -> Array3<f64> {
    let epoch_size = (epoch_dur * sample_rate as f64) as usize;
    let (n_ch, n_t) = signal.dim();
    let n_epochs = n_t / epoch_size;

    if n_epochs == 0 {
        warn!("segment of {n_t} samples shorter than one epoch ({epoch_size} samples), producing no epochs");
        return Array3::zeros((0, n_ch, epoch_size));
    }

    let mut out = Array3::<f64>::zeros((n_epochs, n_ch, epoch_size));
    for e in 0..n_epochs {
        let start = e * epoch_size;
        out.slice_mut(s![e, .., ..])
            .assign(&signal.slice(s![.., start..start + epoch_size]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn epoch_count_and_shape() {
        let data = Array2::from_elem((12, 3840), 1.0_f64);
        let epochs = split_into_epochs(&data, 256, 5.0);
        assert_eq!(epochs.shape(), &[3, 12, 1280]);
    }

    #[test]
    fn trailing_samples_dropped() {
        // 1300 samples with epoch_size=1280 → 1 epoch (20 trailing samples dropped).
        let data = Array2::from_elem((4, 1300), 0.5_f64);
        let epochs = split_into_epochs(&data, 256, 5.0);
        assert_eq!(epochs.shape()[0], 1);
    }

    #[test]
    fn short_signal_yields_empty_batch() {
        let data = Array2::from_elem((4, 1000), 0.5_f64);
        let epochs = split_into_epochs(&data, 256, 5.0);
        assert_eq!(epochs.shape(), &[0, 4, 1280]);
    }

    #[test]
    fn epochs_are_contiguous_in_time() {
        let data = Array2::from_shape_fn((2, 768), |(c, t)| c as f64 * 1e4 + t as f64);
        let epochs = split_into_epochs(&data, 256, 1.0);
        assert_eq!(epochs.shape(), &[3, 2, 256]);
        for e in 0..3 {
            for c in 0..2 {
                for t in 0..256 {
                    assert_eq!(epochs[[e, c, t]], c as f64 * 1e4 + (e * 256 + t) as f64);
                }
            }
        }
    }
}
