//! Tests for job file loading.

use std::fs;
use std::path::Path;

use csvstash_model::{JobConfig, ModelError};
use tempfile::tempdir;

#[test]
fn load_job_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    fs::write(
        &path,
        r#"{
            "csv_file_path": "/data/companies.csv",
            "logstash_conf_path": "/data/logstash.conf",
            "hosts": "https://es.internal:9200",
            "index": "companies",
            "password": "secret"
        }"#,
    )
    .unwrap();

    let job = JobConfig::load(&path).unwrap();
    assert_eq!(
        job.require_csv_file_path().unwrap(),
        Path::new("/data/companies.csv")
    );
    let settings = job.connection_settings().unwrap();
    assert_eq!(settings.hosts, "https://es.internal:9200");
    assert_eq!(settings.index, "companies");
    assert_eq!(settings.user, "");
    assert_eq!(settings.password, "secret");
}

#[test]
fn load_rejects_unknown_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    fs::write(&path, r#"{ "index": "companies", "delimiter": ";" }"#).unwrap();

    let result = JobConfig::load(&path);
    assert!(matches!(result, Err(ModelError::Parse { .. })));
}

#[test]
fn load_missing_file() {
    let dir = tempdir().unwrap();
    let result = JobConfig::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ModelError::Io { .. })));
}

#[test]
fn missing_index_is_reported() {
    let job = JobConfig::default();
    let err = job.connection_settings().unwrap_err();
    assert_eq!(err.to_string(), "missing required setting: index");
    assert!(job.require_logstash_conf_path().is_err());
}
