//! Event annotation parsing.
//!
//! Per-subject summary files are plain text with one block per recording:
//!
//! ```text
//! File Name: chb01_03.edf
//! File Start Time: 13:43:04
//! File End Time: 14:43:04
//! Number of Seizures in File: 1
//! Seizure Start Time: 2996 seconds
//! Seizure End Time: 3036 seconds
//! ```
//!
//! Only `... Time: <n> seconds` lines are event bounds; the clock-time
//! header lines lack the `seconds` suffix and are ignored.
use crate::segment::Segment;

/// Extract the event segments annotated for `file_name`, in sample indices.
///
/// Scopes to the block between `File Name: <file_name>` and the next
/// `File Name:` marker. A recording without a block, or with no annotated
/// events, yields an empty vec.
pub fn events_for_file(summary: &str, file_name: &str, sample_rate: usize) -> Vec<Segment> {
    let marker = format!("File Name: {file_name}");
    let Some(pos) = summary.find(&marker) else {
        return vec![];
    };
    let rest = &summary[pos + marker.len()..];
    let block = match rest.find("File Name:") {
        Some(next) => &rest[..next],
        None => rest,
    };

    let starts = seconds_after(block, "Start Time:");
    let ends = seconds_after(block, "End Time:");
    starts
        .into_iter()
        .zip(ends)
        .map(|(s, e)| Segment::from_seconds(s, e, sample_rate))
        .collect()
}

/// Collect `<n>` from every line of the form `...<key> <n> seconds`.
fn seconds_after(block: &str, key: &str) -> Vec<usize> {
    block
        .lines()
        .filter_map(|line| {
            let (_, tail) = line.split_once(key)?;
            let value = tail.trim().strip_suffix("seconds")?.trim();
            value.parse().ok()
        })
        .collect()
}
