use anyhow::{Context, Result};

use csvstash_conf::PipelineOptions;
use csvstash_model::JobConfig;

use csvstash_cli::pipeline::{DetectResult, PrepareRequest, PrepareResult, detect, prepare};

use crate::cli::{DetectArgs, PrepareArgs};

pub fn run_prepare(args: &PrepareArgs) -> Result<PrepareResult> {
    let request = build_request(args)?;
    prepare(&request)
}

pub fn run_detect(args: &DetectArgs) -> Result<DetectResult> {
    detect(&args.file)
}

/// Job file first, then command-line flags on top.
fn build_request(args: &PrepareArgs) -> Result<PrepareRequest> {
    let base = match &args.config {
        Some(path) => {
            JobConfig::load(path).with_context(|| format!("load job file {}", path.display()))?
        }
        None => JobConfig::default(),
    };
    let job = base.merge(JobConfig {
        csv_file_path: args.csv.clone(),
        logstash_conf_path: args.output.clone(),
        hosts: args.hosts.clone(),
        index: args.index.clone(),
        user: args.user.clone(),
        password: args.password.clone(),
        ssl_certificate_authorities: args.ssl_certificate_authorities.clone(),
    });

    Ok(PrepareRequest {
        source: job.require_csv_file_path()?.to_path_buf(),
        destination: job.require_logstash_conf_path()?.to_path_buf(),
        settings: job.connection_settings()?,
        options: PipelineOptions {
            sincedb_path: args.sincedb_path.clone(),
        },
    })
}
