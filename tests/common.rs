/// Shared fixtures for pipeline tests.
use ndarray::Array2;
use std::path::PathBuf;

#[allow(unused)]
/// Deterministic ramp: `value = channel · 10⁶ + sample index`, so
/// assertions can recover exactly which samples landed where.
pub fn ramp_signal(n_ch: usize, n_t: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_ch, n_t), |(c, t)| c as f64 * 1e6 + t as f64)
}

#[allow(unused)]
/// Deterministic oscillating signal with channel-dependent amplitude, for
/// covariance tests where a ramp would be degenerate.
pub fn wavy_signal(n_ch: usize, n_t: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_ch, n_t), |(c, t)| {
        ((c * 37 + t * 11) as f64 * 0.37).sin() * (c as f64 + 1.0)
    })
}

#[allow(unused)]
/// Unique scratch path under the system temp dir.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("preictal_{}_{name}", std::process::id()))
}
