//! Safetensors container codec.
//!
//! One low-level reader/writer pair shared by recording ingestion
//! ([`crate::recording`]) and dataset persistence ([`crate::dataset`]).
//! Only the subset of the format we produce and consume is implemented:
//! little-endian F64/F32 tensors plus a raw U8 blob for channel names.
use ndarray::{Array1, Array2};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

// ── Reader ────────────────────────────────────────────────────────────────

/// A parsed safetensors file: JSON header plus payload bytes.
pub struct TensorFile {
    header: HashMap<String, serde_json::Value>,
    data_start: usize,
    bytes: Vec<u8>,
}

impl TensorFile {
    /// Read and parse a safetensors file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::parse(std::fs::read(path)?)
    }

    /// Parse an in-memory safetensors image.
    pub fn parse(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(Error::Format("safetensors file too small".into()));
        }
        let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
        if bytes.len() < 8 + n {
            return Err(Error::Format("safetensors header truncated".into()));
        }
        let header: HashMap<String, serde_json::Value> = serde_json::from_slice(&bytes[8..8 + n])?;
        Ok(Self { header, data_start: 8 + n, bytes })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.header.contains_key(name)
    }

    fn entry(&self, name: &str) -> Result<&serde_json::Value> {
        self.header
            .get(name)
            .ok_or_else(|| Error::Format(format!("missing tensor '{name}'")))
    }

    fn raw(&self, entry: &serde_json::Value, name: &str) -> Result<&[u8]> {
        let offsets = entry["data_offsets"]
            .as_array()
            .ok_or_else(|| Error::Format(format!("tensor '{name}' has no data_offsets")))?;
        let s = offsets[0].as_u64().unwrap_or(0) as usize + self.data_start;
        let e = offsets[1].as_u64().unwrap_or(0) as usize + self.data_start;
        self.bytes
            .get(s..e)
            .ok_or_else(|| Error::Format(format!("tensor '{name}' offsets out of range")))
    }

    fn shape(entry: &serde_json::Value) -> Vec<usize> {
        entry["shape"]
            .as_array()
            .map(|a| a.iter().map(|v| v.as_u64().unwrap_or(0) as usize).collect())
            .unwrap_or_default()
    }

    /// Decode a numeric tensor to f64, accepting F64 or F32 payloads.
    fn values(&self, name: &str) -> Result<(Vec<f64>, Vec<usize>)> {
        let entry = self.entry(name)?;
        let raw = self.raw(entry, name)?;
        let dtype = entry["dtype"].as_str().unwrap_or("");
        let vals: Vec<f64> = match dtype {
            "F64" => raw
                .chunks_exact(8)
                .map(|b| f64::from_le_bytes(b.try_into().unwrap()))
                .collect(),
            "F32" => raw
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes(b.try_into().unwrap()) as f64)
                .collect(),
            other => {
                return Err(Error::Format(format!(
                    "tensor '{name}' has unsupported dtype '{other}'"
                )))
            }
        };
        Ok((vals, Self::shape(entry)))
    }

    /// Read a named 2-D tensor. Any other rank is a [`Error::Shape`].
    pub fn f64_arr2(&self, name: &str) -> Result<Array2<f64>> {
        let (vals, shape) = self.values(name)?;
        if shape.len() != 2 {
            return Err(Error::Shape(format!(
                "tensor '{name}' must be 2-D, got {}-D",
                shape.len()
            )));
        }
        Ok(Array2::from_shape_vec((shape[0], shape[1]), vals)?)
    }

    /// Read a named 1-D tensor. Any other rank is a [`Error::Shape`].
    pub fn f64_arr1(&self, name: &str) -> Result<Array1<f64>> {
        let (vals, shape) = self.values(name)?;
        if shape.len() != 1 {
            return Err(Error::Shape(format!(
                "tensor '{name}' must be 1-D, got {}-D",
                shape.len()
            )));
        }
        Ok(Array1::from_vec(vals))
    }

    /// Read a single-element tensor as a scalar.
    pub fn f64_scalar(&self, name: &str) -> Result<f64> {
        let (vals, _) = self.values(name)?;
        vals.first()
            .copied()
            .ok_or_else(|| Error::Format(format!("tensor '{name}' is empty")))
    }

    /// Read a raw U8 blob as UTF-8 text (used for newline-joined channel names).
    pub fn text(&self, name: &str) -> Result<String> {
        let entry = self.entry(name)?;
        let raw = self.raw(entry, name)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| Error::Format(format!("tensor '{name}' is not valid UTF-8")))
    }
}

// ── Writer ────────────────────────────────────────────────────────────────

/// Minimal safetensors writer.
///
/// Usage:
/// ```no_run
/// use preictal::io::TensorWriter;
/// use std::path::Path;
/// let mut w = TensorWriter::new();
/// w.add_f64("labels", &[1.0, 0.0, 0.0], &[3]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct TensorWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl TensorWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_f64_arr1(&mut self, name: &str, arr: &Array1<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.len()]);
    }

    pub fn add_f64_arr2(&mut self, name: &str, arr: &Array2<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    /// Store text (e.g. newline-joined channel names) as a U8 blob.
    pub fn add_text(&mut self, name: &str, text: &str) {
        let bytes = text.as_bytes().to_vec();
        let len = bytes.len();
        self.entries.push((name.to_string(), bytes, "U8", vec![len]));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;

        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(
                name.clone(),
                serde_json::json!({
                    "dtype": dtype,
                    "shape": shape,
                    "data_offsets": [offset, offset + data.len()],
                }),
            );
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes
            .into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();

        let mut f = std::fs::File::create(path)?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn write_then_read_back() {
        let path = std::env::temp_dir().join("preictal_io_roundtrip.safetensors");
        let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let labels = array![1.0, 0.0];

        let mut w = TensorWriter::new();
        w.add_f64_arr2("features", &features);
        w.add_f64_arr1("labels", &labels);
        w.add_text("ch_names", "C3-P3\nC4-P4");
        w.write(&path).unwrap();

        let tf = TensorFile::open(&path).unwrap();
        assert_eq!(tf.f64_arr2("features").unwrap(), features);
        assert_eq!(tf.f64_arr1("labels").unwrap(), labels);
        assert_eq!(tf.text("ch_names").unwrap(), "C3-P3\nC4-P4");
        assert!(!tf.contains("nope"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rank_mismatch_is_a_shape_error() {
        let mut w = TensorWriter::new();
        w.add_f64("data", &[1.0, 2.0], &[2]);
        let path = std::env::temp_dir().join("preictal_io_rank.safetensors");
        w.write(&path).unwrap();

        let tf = TensorFile::open(&path).unwrap();
        assert!(matches!(
            tf.f64_arr2("data"),
            Err(crate::error::Error::Shape(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn truncated_file_is_a_format_error() {
        assert!(matches!(
            TensorFile::parse(vec![1, 2, 3]),
            Err(crate::error::Error::Format(_))
        ));
    }
}
