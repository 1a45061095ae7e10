//! # preictal — seizure-precursor dataset extraction
//!
//! `preictal` converts raw multi-channel EEG recordings with annotated
//! seizure intervals into labeled fixed-length feature vectors for binary
//! classification (precursor vs. non-precursor).
//!
//! ## Pipeline overview
//!
//! ```text
//! chb01_03.safetensors + chb01-summary.txt
//!   │
//!   ├─ recording::Recording::load()   [C, T] f64 + sfreq + channel names
//!   ├─ select_channels()              fixed 18-channel montage
//!   ├─ annotations::events_for_file() seizure [start, end) sample segments
//!   ├─ window::preceding_window()     pre-ictal comparison window per event
//!   ├─ epoch::split_into_epochs()     non-overlapping 5 s windows
//!   ├─ CovarianceExtractor            C·(C+1)/2 covariance features/epoch
//!   └─ dataset::LabeledDataset        features (N, F) + labels (N,) → disk
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use preictal::{process_recording, PipelineConfig, Recording, CHANNELS_TO_KEEP};
//! use preictal::annotations::events_for_file;
//! use std::path::Path;
//!
//! let mut rec = Recording::load(Path::new("data/chb01/chb01_03.safetensors")).unwrap();
//! rec.select_channels(&CHANNELS_TO_KEEP).unwrap();
//!
//! let summary = std::fs::read_to_string("data/chb01/chb01-summary.txt").unwrap();
//! let events = events_for_file(&summary, "chb01_03.edf", rec.sample_rate);
//!
//! let cfg = PipelineConfig::default();
//! if let Some(dataset) = process_recording(&rec, &events, &cfg).unwrap() {
//!     println!("{} labeled rows, {} features each",
//!         dataset.len(), dataset.features.ncols());
//! }
//! ```
//!
//! Each step is also exposed as a standalone pure function, so the core is
//! testable without any files or ambient state:
//!
//! ```
//! use preictal::{preceding_window, split_into_epochs, Segment};
//! use preictal::extractor::{CovarianceExtractor, FeatureExtractor};
//! use ndarray::Array2;
//!
//! let signal: Array2<f64> = Array2::zeros((4, 2560));
//!
//! let window = preceding_window(&signal, Segment::new(1280, 1536), 256, 1.0, 2);
//! let epochs = split_into_epochs(&window, 256, 1.0);
//! let features = CovarianceExtractor::extract_all(epochs.outer_iter(), Some(256));
//! assert_eq!(features.dim(), (2, 10));
//! ```

pub mod annotations;
pub mod config;
pub mod dataset;
pub mod epoch;
pub mod error;
pub mod extractor;
pub mod io;
pub mod recording;
pub mod segment;
pub mod window;

use log::warn;
use ndarray::{concatenate, Array1, Array2, Axis};

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `preictal::Foo` without having to know the internal module layout.

pub use config::PipelineConfig;
pub use dataset::{load_train_test_split, LabeledDataset, StorageFormat};
pub use epoch::split_into_epochs;
pub use error::{Error, Result};
pub use extractor::{CovarianceExtractor, FeatureExtractor};
pub use recording::{Recording, CHANNELS_TO_KEEP};
pub use segment::Segment;
pub use window::preceding_window;

/// Run the full extraction pipeline on one recording.
///
/// For every event: slice the event region and derive its pre-event
/// comparison window ([`preceding_window`]); epoch every region
/// independently ([`split_into_epochs`]); concatenate all event epochs into
/// one batch and all comparison epochs into another; reduce both batches to
/// covariance features; label event rows `1.0` and comparison rows `0.0`.
///
/// Returns `Ok(None)` (a skip signal, not an error) when there are no
/// events or when either concatenated batch holds zero whole epochs (for
/// example an event shorter than one epoch, or an event so close to the
/// recording start that its comparison window is empty).
///
/// # Errors
///
/// Feature/label assembly errors surface as [`Error::Shape`]; they indicate
/// malformed inputs and abort the current recording.
pub fn process_recording(
    recording: &Recording,
    events: &[Segment],
    cfg: &PipelineConfig,
) -> Result<Option<LabeledDataset>> {
    if events.is_empty() {
        warn!("no events for '{}'", recording.path.display());
        return Ok(None);
    }

    let sample_rate = recording.sample_rate;
    let event_regions = recording.event_data(events);

    let mut ictal_batches = Vec::with_capacity(events.len());
    let mut preictal_batches = Vec::with_capacity(events.len());
    for (event, region) in events.iter().zip(&event_regions) {
        ictal_batches.push(split_into_epochs(region, sample_rate, cfg.epoch_dur));

        let window = preceding_window(
            &recording.data,
            *event,
            sample_rate,
            cfg.offset_secs,
            cfg.multiplier,
        );
        preictal_batches.push(split_into_epochs(&window, sample_rate, cfg.epoch_dur));
    }

    let ictal = concat_batches(&ictal_batches)?;
    let preictal = concat_batches(&preictal_batches)?;

    let n_ictal = ictal.shape()[0];
    let n_preictal = preictal.shape()[0];
    if n_ictal == 0 || n_preictal == 0 {
        warn!(
            "'{}': {n_ictal} event epochs, {n_preictal} comparison epochs; skipping",
            recording.path.display()
        );
        return Ok(None);
    }

    let ictal_features = CovarianceExtractor::extract_all(ictal.outer_iter(), Some(sample_rate));
    let preictal_features =
        CovarianceExtractor::extract_all(preictal.outer_iter(), Some(sample_rate));

    let features: Array2<f64> =
        concatenate(Axis(0), &[ictal_features.view(), preictal_features.view()])?;
    let labels: Array1<f64> = concatenate(
        Axis(0),
        &[Array1::ones(n_ictal).view(), Array1::zeros(n_preictal).view()],
    )?;

    LabeledDataset::new(features, labels).map(Some)
}

/// Stack per-event epoch batches along the epoch axis. Empty batches are
/// legal and contribute nothing.
fn concat_batches(batches: &[ndarray::Array3<f64>]) -> Result<ndarray::Array3<f64>> {
    let views: Vec<_> = batches.iter().map(|b| b.view()).collect();
    Ok(concatenate(Axis(0), &views)?)
}
