use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::Value;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    cli::{InspectCmd, NormalizeCmd},
    config::Config,
    manifest::build_manifest,
    metadata::{Clock, load_sidecar},
    model::{ManifestDocument, TranscriptDocument},
    normalize::{normalize_transcript, video_id_from_path},
};

/// A video that could not be normalized, and why.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub video_id: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct BatchReport {
    pub manifest: ManifestDocument,
    pub failures: Vec<FileFailure>,
    pub skipped: Vec<String>,
    pub total_segments: usize,
}

pub fn run_normalize(cmd: NormalizeCmd, cfg: &Config, clock: &dyn Clock) -> Result<BatchReport> {
    let input_dir = cmd.input.unwrap_or_else(|| cfg.paths.input_dir.clone());
    let output_dir = cmd.output.unwrap_or_else(|| cfg.paths.output_dir.clone());
    let fail_fast = cmd.fail_fast || cfg.policy.fail_fast;
    let skip_empty = cmd.skip_empty || cfg.policy.skip_empty;

    let span = tracing::info_span!(
        "normalize",
        input = %input_dir.display(),
        output = %output_dir.display()
    );
    let _g = span.enter();

    if !input_dir.is_dir() {
        bail!("input directory does not exist: {}", input_dir.display());
    }

    let vtt_files = discover_vtt_files(&input_dir)?;
    if vtt_files.is_empty() {
        bail!("no VTT files found in {}", input_dir.display());
    }
    tracing::info!(files = vtt_files.len(), "found caption files");

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed creating output dir: {}", output_dir.display()))?;

    let mut transcripts: Vec<TranscriptDocument> = Vec::with_capacity(vtt_files.len());
    let mut failures = Vec::new();
    let mut skipped = Vec::new();

    let mut written: HashSet<String> = HashSet::new();

    for vtt_path in &vtt_files {
        let Some(video_id) = video_id_from_path(vtt_path) else {
            let name = vtt_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| vtt_path.display().to_string());
            let err = anyhow!("cannot derive a video id from the file name");
            record_failure(&mut failures, name, err, fail_fast)?;
            continue;
        };

        let _v = tracing::info_span!("video", id = video_id.as_str()).entered();

        let doc = match normalize_file(vtt_path, &video_id, cfg, clock) {
            Ok(doc) => doc,
            Err(err) => {
                record_failure(&mut failures, video_id, err, fail_fast)?;
                continue;
            }
        };

        log_transcript_summary(&doc, cfg);

        if doc.is_empty() {
            tracing::warn!("no caption segments survived extraction");
            if skip_empty {
                skipped.push(video_id);
                continue;
            }
        }

        if !written.insert(doc.video_id().to_string()) {
            tracing::warn!(
                video_id = doc.video_id(),
                path = %vtt_path.display(),
                "video id already written in this run; overwriting"
            );
        }

        let out_path = output_dir.join(format!("{}.json", doc.video_id()));
        if let Err(err) = write_json(&out_path, &doc, cfg.output.pretty) {
            record_failure(&mut failures, video_id, err, fail_fast)?;
            continue;
        }
        tracing::debug!(path = %out_path.display(), "wrote transcript");

        transcripts.push(doc);
    }

    let manifest = build_manifest(&transcripts, clock);
    let manifest_path = output_dir.join(&cfg.output.manifest_name);
    write_json(&manifest_path, &manifest, cfg.output.pretty)?;

    let total_segments = transcripts.iter().map(|t| t.segments.len()).sum();
    tracing::info!(
        videos = manifest.total_videos,
        failures = failures.len(),
        skipped = skipped.len(),
        total_segments,
        manifest = %manifest_path.display(),
        "normalization finished"
    );

    Ok(BatchReport {
        manifest,
        failures,
        skipped,
        total_segments,
    })
}

pub fn run_inspect(cmd: InspectCmd, cfg: &Config, clock: &dyn Clock) -> Result<()> {
    let video_id = video_id_from_path(&cmd.input)
        .ok_or_else(|| anyhow!("bad input filename: {}", cmd.input.display()))?;

    let metadata = match &cmd.metadata {
        Some(path) => load_sidecar(path)?,
        None => load_metadata_lenient(&sidecar_path(&cmd.input, &video_id, cfg)),
    };

    let raw = fs::read_to_string(&cmd.input)
        .with_context(|| format!("failed reading {}", cmd.input.display()))?;
    let doc = normalize_transcript(&raw, metadata.as_ref(), &video_id, clock)?;
    log_transcript_summary(&doc, cfg);

    println!("{}", to_json(&doc, cfg.output.pretty)?);
    Ok(())
}

/// Record a per-file failure, or turn it into the run's error under fail-fast.
fn record_failure(
    failures: &mut Vec<FileFailure>,
    video_id: String,
    err: anyhow::Error,
    fail_fast: bool,
) -> Result<()> {
    if fail_fast {
        return Err(err.context(format!("failed normalizing {video_id}")));
    }
    let reason = format!("{err:#}");
    tracing::error!(
        video_id = video_id.as_str(),
        error = reason.as_str(),
        "failed normalizing; skipping"
    );
    failures.push(FileFailure { video_id, reason });
    Ok(())
}

fn normalize_file(
    vtt_path: &Path,
    video_id: &str,
    cfg: &Config,
    clock: &dyn Clock,
) -> Result<TranscriptDocument> {
    let raw = fs::read_to_string(vtt_path)
        .with_context(|| format!("failed reading {}", vtt_path.display()))?;
    tracing::debug!(bytes = raw.len(), "read captions");

    let metadata = load_metadata_lenient(&sidecar_path(vtt_path, video_id, cfg));
    let doc = normalize_transcript(&raw, metadata.as_ref(), video_id, clock)?;
    Ok(doc)
}

fn sidecar_path(vtt_path: &Path, video_id: &str, cfg: &Config) -> PathBuf {
    let parent = vtt_path.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{video_id}{}", cfg.output.metadata_suffix))
}

/// An unreadable sidecar is treated like a missing one.
fn load_metadata_lenient(path: &Path) -> Option<Value> {
    match load_sidecar(path) {
        Ok(None) => {
            tracing::info!(path = %path.display(), "no metadata sidecar; using defaults");
            None
        }
        Ok(meta) => meta,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unusable metadata sidecar");
            None
        }
    }
}

fn discover_vtt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed listing {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_vtt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("vtt"));
        if is_vtt && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(s)
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let data = to_json(value, pretty)?;
    fs::write(path, data).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

fn log_transcript_summary(t: &TranscriptDocument, cfg: &Config) {
    tracing::info!(
        video_id = t.video_id(),
        segments = t.segments.len(),
        covered_seconds = t.covered_seconds(),
        "transcript summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_segment_samples.min(t.segments.len());
        for (i, s) in t.segments.iter().take(n).enumerate() {
            tracing::debug!(
                idx = i,
                start = s.start,
                dur = s.dur,
                chars = s.text.chars().count(),
                "segment sample"
            );
        }
    }
}
