//! Labeled feature datasets: accumulation, persistence, subject splits.
//!
//! One dataset per subject, grown additively as that subject's recordings
//! are processed. Two interchangeable on-disk encodings, both storing the
//! named arrays `features` `(N, F)` and `labels` `(N,)`.
use ndarray::{concatenate, Array1, Array2, Axis};
use ndarray_npy::{NpzReader, NpzWriter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::{TensorFile, TensorWriter};

/// On-disk encoding for [`LabeledDataset`] files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    /// Compressed numpy multi-array archive.
    Npz,
    /// Safetensors container ([`crate::io`]).
    Safetensors,
}

impl StorageFormat {
    /// File suffix for this encoding.
    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Npz => "npz",
            StorageFormat::Safetensors => "safetensors",
        }
    }
}

/// Parallel feature/label arrays for binary classification.
///
/// Row `i` of `features` is one epoch's feature vector; `labels[i]` is
/// `1.0` for event-derived rows and `0.0` for comparison-window rows.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl LabeledDataset {
    /// Pair features with labels; the row counts must agree.
    pub fn new(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::Shape(format!(
                "{} feature rows vs {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// A dataset with no rows (merge identity).
    pub fn empty() -> Self {
        Self {
            features: Array2::zeros((0, 0)),
            labels: Array1::zeros(0),
        }
    }

    /// Number of labeled rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `other`'s rows after `self`'s. No deduplication: merging the
    /// same rows twice keeps both copies.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        let features = concatenate(Axis(0), &[self.features.view(), other.features.view()])?;
        let labels = concatenate(Axis(0), &[self.labels.view(), other.labels.view()])?;
        Ok(Self { features, labels })
    }

    /// Persist under the chosen encoding.
    pub fn save(&self, path: &Path, format: StorageFormat) -> Result<()> {
        match format {
            StorageFormat::Npz => {
                let mut npz = NpzWriter::new_compressed(File::create(path)?);
                npz.add_array("features", &self.features).map_err(npz_err)?;
                npz.add_array("labels", &self.labels).map_err(npz_err)?;
                npz.finish().map_err(npz_err)?;
            }
            StorageFormat::Safetensors => {
                let mut w = TensorWriter::new();
                w.add_f64_arr2("features", &self.features);
                w.add_f64_arr1("labels", &self.labels);
                w.write(path)?;
            }
        }
        Ok(())
    }

    /// Load a dataset previously written by [`save`](Self::save).
    pub fn load(path: &Path, format: StorageFormat) -> Result<Self> {
        match format {
            StorageFormat::Npz => {
                let mut npz = NpzReader::new(File::open(path)?).map_err(npz_err)?;
                let features: Array2<f64> = npz.by_name("features").map_err(npz_err)?;
                let labels: Array1<f64> = npz.by_name("labels").map_err(npz_err)?;
                Self::new(features, labels)
            }
            StorageFormat::Safetensors => {
                let tf = TensorFile::open(path)?;
                Self::new(tf.f64_arr2("features")?, tf.f64_arr1("labels")?)
            }
        }
    }
}

fn npz_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Format(e.to_string())
}

/// Load every per-subject dataset file in `data_dir` and split by subject.
///
/// Subjects (files) are split, not rows, so no subject contributes to both
/// sides. Returns `(x_train, x_test, y_train, y_test)`.
pub fn load_train_test_split(
    data_dir: &Path,
    train_ratio: f64,
    shuffle: bool,
    seed: u64,
    format: StorageFormat,
) -> Result<(Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>)> {
    if !data_dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "'{}' is not a directory",
            data_dir.display()
        )));
    }
    if !(0.0 < train_ratio && train_ratio < 1.0) {
        return Err(Error::InvalidInput(
            "train_ratio must be between 0 and 1".into(),
        ));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|x| x == format.extension()))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no .{} files found in '{}'",
            format.extension(),
            data_dir.display()
        )));
    }

    if shuffle {
        files.shuffle(&mut StdRng::seed_from_u64(seed));
    }

    let split_idx = (files.len() as f64 * train_ratio) as usize;
    let (train_files, test_files) = files.split_at(split_idx);
    if train_files.is_empty() || test_files.is_empty() {
        return Err(Error::InvalidInput(
            "split leaves no subjects for training or testing".into(),
        ));
    }

    let train = load_concat(train_files, format)?;
    let test = load_concat(test_files, format)?;
    Ok((train.features, test.features, train.labels, test.labels))
}

fn load_concat(files: &[PathBuf], format: StorageFormat) -> Result<LabeledDataset> {
    let mut acc = LabeledDataset::empty();
    for file in files {
        acc = acc.merge(&LabeledDataset::load(file, format)?)?;
    }
    Ok(acc)
}
