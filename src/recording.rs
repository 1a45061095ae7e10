//! Recording ingestion.
//!
//! Recordings enter the pipeline as safetensors exports of the raw EDF
//! files (companion Python script), with named tensors:
//!
//! * `data`     `[C, T]`  F64/F32  signal in original units
//! * `sfreq`    `[1]`              sampling rate in Hz
//! * `ch_names` U8 blob            newline-joined channel names (optional)
//!
//! Wire-format parsing of the recording hardware's own container is out of
//! scope; this module only demultiplexes the export and applies the fixed
//! montage subset.
use ndarray::{s, Array2, Axis};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::TensorFile;
use crate::segment::Segment;

/// The bipolar derivations kept from every recording, in output order.
///
/// Recordings carry extra or duplicated electrodes; only this fixed montage
/// participates in feature extraction so feature vectors are comparable
/// across files and subjects.
pub const CHANNELS_TO_KEEP: [&str; 18] = [
    "FP1-F7", "F7-T7", "T7-P7", "P7-O1", "FP1-F3", "F3-C3", "C3-P3", "P3-O1", "FP2-F4", "F4-C4",
    "C4-P4", "P4-O2", "FP2-F8", "F8-T8", "T8-P8", "P8-O2", "FZ-CZ", "CZ-PZ",
];

/// A loaded multi-channel recording.
pub struct Recording {
    /// Signal matrix, `[C, T]`.
    pub data: Array2<f64>,
    /// Sampling rate in Hz.
    pub sample_rate: usize,
    /// Channel names, parallel to the rows of `data`.
    pub channel_names: Vec<String>,
    /// Source file the recording was loaded from.
    pub path: PathBuf,
}

impl Recording {
    /// Load a recording export from disk.
    ///
    /// An unreadable file is an [`Error::Recording`]; a readable file with
    /// a malformed or non-2-D `data` tensor is a format/shape error.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Recording {
            path: path.to_path_buf(),
            source,
        })?;
        let tf = TensorFile::parse(bytes)?;

        let data = tf.f64_arr2("data")?;
        let sample_rate = tf.f64_scalar("sfreq")? as usize;

        let mut channel_names: Vec<String> = if tf.contains("ch_names") {
            tf.text("ch_names")?
                .split('\n')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        } else {
            vec![]
        };

        // Some files carry two 'T8-P8' electrodes, exported as 'T8-P8-0'
        // and 'T8-P8-1'; the first one is the montage channel.
        if let Some(idx) = channel_names.iter().position(|n| n == "T8-P8-0") {
            channel_names[idx] = "T8-P8".to_string();
        }

        Ok(Self {
            data,
            sample_rate,
            channel_names,
            path: path.to_path_buf(),
        })
    }

    /// Build a recording from parts (in-memory use and tests).
    pub fn from_parts(data: Array2<f64>, sample_rate: usize, channel_names: Vec<String>) -> Self {
        Self {
            data,
            sample_rate,
            channel_names,
            path: PathBuf::new(),
        }
    }

    /// Reduce the recording to the named channel subset, reordering rows to
    /// match `keep`.
    ///
    /// Every requested channel must be present; otherwise the recording is
    /// unusable for a comparable feature set and [`Error::MissingChannels`]
    /// is returned with the absent names.
    pub fn select_channels(&mut self, keep: &[&str]) -> Result<()> {
        let idx_map: HashMap<&str, usize> = self
            .channel_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut indices = Vec::with_capacity(keep.len());
        let mut missing = Vec::new();
        for name in keep {
            match idx_map.get(name) {
                Some(&i) => indices.push(i),
                None => missing.push((*name).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(Error::MissingChannels {
                file: self
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                missing,
            });
        }

        self.data = self.data.select(Axis(0), &indices);
        self.channel_names = keep.iter().map(|s| s.to_string()).collect();
        Ok(())
    }

    /// Slice the signal for each event segment (bounds clamped to the
    /// recording length, so over-long annotations truncate silently).
    pub fn event_data(&self, events: &[Segment]) -> Vec<Array2<f64>> {
        let n_t = self.data.ncols();
        events
            .iter()
            .map(|seg| {
                let seg = seg.clamped(n_t);
                self.data.slice(s![.., seg.start..seg.end]).to_owned()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn select_reorders_to_requested_order() {
        let data = Array2::from_shape_fn((3, 10), |(c, t)| c as f64 * 100.0 + t as f64);
        let mut rec = Recording::from_parts(data, 256, names(&["C4-P4", "C3-P3", "EKG"]));
        rec.select_channels(&["C3-P3", "C4-P4"]).unwrap();
        assert_eq!(rec.channel_names, names(&["C3-P3", "C4-P4"]));
        assert_eq!(rec.data.dim(), (2, 10));
        assert_eq!(rec.data[[0, 0]], 100.0); // C3-P3 was row 1
        assert_eq!(rec.data[[1, 0]], 0.0); // C4-P4 was row 0
    }

    #[test]
    fn missing_channels_reported_by_name() {
        let data = Array2::zeros((1, 10));
        let mut rec = Recording::from_parts(data, 256, names(&["C3-P3"]));
        let err = rec.select_channels(&["C3-P3", "CZ-PZ"]).unwrap_err();
        match err {
            Error::MissingChannels { missing, .. } => {
                assert_eq!(missing, names(&["CZ-PZ"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn event_data_clamps_to_recording_length() {
        let data = Array2::from_shape_fn((2, 100), |(_, t)| t as f64);
        let rec = Recording::from_parts(data, 100, vec![]);
        let slices = rec.event_data(&[Segment::new(90, 150)]);
        assert_eq!(slices[0].dim(), (2, 10));
        assert_eq!(slices[0][[0, 0]], 90.0);
    }
}
