//! Dataset extraction driver.
//!
//! Walks a dataset root laid out one directory per subject (recordings plus
//! a `<subject>-summary.txt` annotation file), runs the extraction pipeline
//! on every recording with at least one annotated event, and accumulates
//! per-subject labeled datasets in the output directory. A failure on one
//! recording is logged and the run continues with the next.
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use preictal::annotations::events_for_file;
use preictal::{
    process_recording, Error, LabeledDataset, PipelineConfig, Recording, StorageFormat,
    CHANNELS_TO_KEEP,
};

#[derive(Parser)]
#[command(name = "extract", about = "Build labeled seizure-precursor datasets from annotated EEG recordings")]
struct Args {
    /// Dataset root: one directory per subject containing recording
    /// exports and a <subject>-summary.txt annotation file
    #[arg(long)]
    data_root: PathBuf,

    /// Output directory for per-subject dataset files
    #[arg(long, default_value = "out/data")]
    out_dir: PathBuf,

    /// Gap between comparison window and event onset, in seconds
    #[arg(long, default_value_t = 300.0)]
    offset_secs: f64,

    /// Comparison-window width as a multiple of the event duration
    #[arg(long, default_value_t = 3)]
    multiplier: usize,

    /// Epoch duration in seconds
    #[arg(long, default_value_t = 5.0)]
    epoch_dur: f64,

    /// On-disk encoding for the dataset files
    #[arg(long, value_enum, default_value = "npz")]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Npz,
    Safetensors,
}

impl From<Format> for StorageFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Npz => StorageFormat::Npz,
            Format::Safetensors => StorageFormat::Safetensors,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = PipelineConfig {
        offset_secs: args.offset_secs,
        multiplier: args.multiplier,
        epoch_dur: args.epoch_dur,
    };
    let format = StorageFormat::from(args.format);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory '{}'", args.out_dir.display()))?;

    let mut subjects: Vec<PathBuf> = fs::read_dir(&args.data_root)
        .with_context(|| format!("reading dataset root '{}'", args.data_root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    subjects.sort();
    info!(
        "{} subject directories under '{}'",
        subjects.len(),
        args.data_root.display()
    );

    for dir in subjects {
        let subject = dir.file_name().unwrap_or_default().to_string_lossy().into_owned();
        let summary_path = dir.join(format!("{subject}-summary.txt"));
        let summary = match fs::read_to_string(&summary_path) {
            Ok(text) => text,
            Err(err) => {
                warn!("no summary for '{subject}' ({err}); skipping subject");
                continue;
            }
        };

        let mut recordings: Vec<PathBuf> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.extension().is_some_and(|x| x == "safetensors"))
                .collect(),
            Err(err) => {
                warn!("cannot list '{}' ({err}); skipping subject", dir.display());
                continue;
            }
        };
        recordings.sort();

        for path in recordings {
            if let Err(err) = process_file(&path, &summary, &cfg, &args.out_dir, format) {
                // Missing files/channels are expected operational skips;
                // anything else is a real per-recording failure.
                match &err {
                    Error::Recording { .. } | Error::MissingChannels { .. } => {
                        warn!("skipping '{}': {err}", path.display());
                    }
                    _ => error!("failed on '{}': {err}", path.display()),
                }
            }
        }
    }

    Ok(())
}

/// Process one recording and fold its rows into the subject's dataset file.
fn process_file(
    path: &Path,
    summary: &str,
    cfg: &PipelineConfig,
    out_dir: &Path,
    format: StorageFormat,
) -> std::result::Result<(), Error> {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();

    let mut rec = Recording::load(path)?;
    rec.select_channels(&CHANNELS_TO_KEEP)?;

    // Summaries reference the original EDF file names.
    let events = events_for_file(summary, &format!("{stem}.edf"), rec.sample_rate);
    if events.is_empty() {
        info!("'{stem}': no annotated events");
        return Ok(());
    }
    info!("'{stem}': {} events @ {} Hz", events.len(), rec.sample_rate);

    let Some(fresh) = process_recording(&rec, &events, cfg)? else {
        return Ok(());
    };

    let added = fresh.len();
    let subject = stem.split('_').next().unwrap_or(&stem);
    let out_path = out_dir.join(format!("{subject}.{}", format.extension()));
    let merged = if out_path.exists() {
        LabeledDataset::load(&out_path, format)?.merge(&fresh)?
    } else {
        fresh
    };
    merged.save(&out_path, format)?;
    info!(
        "'{stem}': +{added} rows → {} ({} total)",
        out_path.display(),
        merged.len()
    );
    Ok(())
}
