//! Comparison-window derivation.
//!
//! For an event `[s, e)` the comparison window is the interval ending
//! `offset` samples before the event onset, `multiplier × (e − s)` samples
//! wide. Each bound is clipped to the recording start independently, so an
//! event close to the start yields a narrowed or empty window.
use ndarray::{s, Array2};

use crate::segment::Segment;

/// Slice the pre-event comparison window out of `signal` (`[C, T]`).
///
/// * `offset_samples = round(offset_secs × sample_rate)`
/// * `window_end     = event.start − offset_samples`
/// * `window_start   = window_end − event.len() × multiplier`
///
/// Both bounds are clamped to `[0, T]`. The result may be zero-width when
/// the event occurs too close to the recording start; callers treat that
/// the same as a segment with no whole epochs.
pub fn preceding_window(
    signal: &Array2<f64>,
    event: Segment,
    sample_rate: usize,
    offset_secs: f64,
    multiplier: usize,
) -> Array2<f64> {
    let n_t = signal.ncols() as i64;
    let offset = (offset_secs * sample_rate as f64).round() as i64;

    let end = event.start as i64 - offset;
    let start = end - (event.len() * multiplier) as i64;

    // Clip each bound on its own; start ≤ end is preserved.
    let end = end.clamp(0, n_t) as usize;
    let start = start.clamp(0, n_t) as usize;

    signal.slice(s![.., start..end]).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn ramp(n_ch: usize, n_t: usize) -> Array2<f64> {
        Array2::from_shape_fn((n_ch, n_t), |(c, t)| c as f64 * 1e6 + t as f64)
    }

    #[test]
    fn full_width_window_when_room() {
        // Event [1280, 1536), offset 1 s @ 256 Hz, multiplier 2
        // → window [512, 1024).
        let sig = ramp(4, 2560);
        let w = preceding_window(&sig, Segment::new(1280, 1536), 256, 1.0, 2);
        assert_eq!(w.dim(), (4, 512));
        assert_eq!(w[[0, 0]], 512.0);
        assert_eq!(w[[3, 511]], 3e6 + 1023.0);
    }

    #[test]
    fn start_clipped_to_zero() {
        // window_end = 400 − 100 = 300, window_start = 300 − 600 < 0.
        let sig = ramp(2, 1000);
        let w = preceding_window(&sig, Segment::new(400, 600), 100, 1.0, 3);
        assert_eq!(w.dim(), (2, 300));
        assert_eq!(w[[0, 0]], 0.0);
    }

    #[test]
    fn empty_window_when_offset_covers_onset() {
        // offset_samples ≥ event.start → both bounds clip to 0.
        let sig = ramp(2, 1000);
        let w = preceding_window(&sig, Segment::new(100, 200), 100, 2.0, 3);
        assert_eq!(w.dim(), (2, 0));
    }

    #[test]
    fn fractional_offset_rounds_to_nearest_sample() {
        let sig = ramp(1, 1000);
        // 0.5 s at 101 Hz → 50.5 → rounds to 51 samples.
        let w = preceding_window(&sig, Segment::new(500, 510), 101, 0.5, 1);
        assert_eq!(w.ncols(), 10);
        assert_eq!(w[[0, 0]], (500 - 51 - 10) as f64);
    }
}
