//! Two-stage preparation pipeline.
//!
//! 1. **Normalize**: make sure the CSV is UTF-8, writing a `_utf8` copy when
//!    it is not
//! 2. **Generate**: write the Logstash pipeline for the normalized file
//!
//! Stages share nothing but the normalized path; settings arrive as one
//! immutable [`PrepareRequest`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use csvstash_conf::{GeneratedConfig, PipelineOptions, generate};
use csvstash_ingest::{NormalizeOutcome, SniffedEncoding, detect_encoding, normalize, sniff};
use csvstash_model::{ConnectionSettings, SourceEncoding};

/// Inputs for a full run.
#[derive(Debug, Clone)]
pub struct PrepareRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub settings: ConnectionSettings,
    pub options: PipelineOptions,
}

/// Outputs of a successful run.
#[derive(Debug, Clone)]
pub struct PrepareResult {
    pub normalized: NormalizeOutcome,
    pub generated: GeneratedConfig,
}

/// Normalize the source CSV, then generate the pipeline for it.
pub fn prepare(request: &PrepareRequest) -> Result<PrepareResult> {
    if !request.source.is_file() {
        bail!("csv file not found: {}", request.source.display());
    }
    request
        .settings
        .validate()
        .context("invalid connection settings")?;

    // =========================================================================
    // Stage 1: Normalize
    // =========================================================================
    let normalize_span = info_span!("stage", name = "normalize");
    let stage_start = Instant::now();
    let normalized = normalize_span
        .in_scope(|| normalize(&request.source))
        .with_context(|| format!("normalize {}", request.source.display()))?;
    info!(
        detected = %normalized.detected,
        path = %normalized.path.display(),
        rewritten = normalized.rewritten(),
        duration_ms = stage_start.elapsed().as_millis(),
        "normalize complete"
    );

    // =========================================================================
    // Stage 2: Generate
    // =========================================================================
    let generate_span = info_span!("stage", name = "generate");
    let stage_start = Instant::now();
    let generated = generate_span
        .in_scope(|| {
            generate(
                &normalized.path,
                &request.settings,
                &request.destination,
                &request.options,
            )
        })
        .with_context(|| format!("generate {}", request.destination.display()))?;
    info!(
        encoding = %generated.encoding,
        columns = generated.columns.len(),
        duration_ms = stage_start.elapsed().as_millis(),
        "generate complete"
    );

    Ok(PrepareResult {
        normalized,
        generated,
    })
}

/// What the two detectors say about a file, without writing anything.
#[derive(Debug, Clone)]
pub struct DetectResult {
    pub path: PathBuf,
    pub detected: SourceEncoding,
    pub sniffed: Option<SniffedEncoding>,
    pub records: usize,
}

pub fn detect(path: &Path) -> Result<DetectResult> {
    let detection =
        detect_encoding(path).with_context(|| format!("detect encoding of {}", path.display()))?;
    let sniffed = sniff(path).with_context(|| format!("sniff {}", path.display()))?;
    Ok(DetectResult {
        path: path.to_path_buf(),
        detected: detection.encoding,
        sniffed,
        records: detection.records.len(),
    })
}

/// Example commands for running Logstash against a generated pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationHints {
    pub windows: String,
    pub linux: String,
}

pub fn invocation_hints(conf_path: &Path) -> InvocationHints {
    let display = conf_path.display().to_string();
    InvocationHints {
        windows: format!(
            "path\\to\\logstash -f \"{}\"",
            display.replace('/', "\\")
        ),
        linux: format!("/path/to/logstash -f {display}"),
    }
}
