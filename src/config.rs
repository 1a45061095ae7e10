//! Pipeline configuration.
//!
//! [`PipelineConfig`] holds every tunable parameter of the extraction
//! pipeline. The defaults are the values the reference dataset was built
//! with.

/// Configuration for the seizure-precursor extraction pipeline.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use preictal::PipelineConfig;
///
/// let cfg = PipelineConfig {
///     epoch_dur: 2.0,    // shorter epochs
///     ..PipelineConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Gap in seconds between the end of the comparison window and the
    /// event onset. The window never reaches closer to the event than
    /// this offset.
    ///
    /// Default: `300.0` s (5 minutes).
    pub offset_secs: f64,

    /// Width of the comparison window as a multiple of the event duration.
    /// An event of `L` samples gets a preceding window of `L × multiplier`
    /// samples (before boundary clipping).
    ///
    /// Default: `3`.
    pub multiplier: usize,

    /// Duration of each epoch in seconds.
    ///
    /// Both event and comparison regions are cut into non-overlapping
    /// windows of this length; trailing samples that do not fill a complete
    /// window are discarded.
    ///
    /// Default: `5.0` s.
    pub epoch_dur: f64,
}

impl Default for PipelineConfig {
    /// Returns the reference settings: 300 s offset, 3× window, 5 s epochs.
    fn default() -> Self {
        Self {
            offset_secs: 300.0,
            multiplier: 3,
            epoch_dur: 5.0,
        }
    }
}

impl PipelineConfig {
    /// Number of samples per epoch at the given sampling rate.
    ///
    /// ```
    /// use preictal::PipelineConfig;
    /// assert_eq!(PipelineConfig::default().epoch_samples(256), 1280);
    /// ```
    pub fn epoch_samples(&self, sample_rate: usize) -> usize {
        (self.epoch_dur * sample_rate as f64) as usize
    }
}
