//! Integration tests for CSV normalization.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use encoding_rs::EUC_KR;
use tempfile::{TempDir, tempdir};

use csvstash_ingest::{
    IngestError, SniffedEncoding, normalize, normalized_path, read_csv_header, sniff,
};
use csvstash_model::SourceEncoding;

const SAMPLE: &str = "id,name,amount\n\
                      1,주식회사 가나,1000\n\
                      2,\"다라 (본점)\",2500\n\
                      3,마바  사,300\n";

fn write_source(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

fn expected_rows() -> Vec<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(SAMPLE.as_bytes());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

#[test]
fn cp949_source_gets_utf8_sibling() {
    let dir = tempdir().unwrap();
    let (bytes, _, _) = EUC_KR.encode(SAMPLE);
    let source = write_source(&dir, "companies.csv", &bytes);

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.detected, SourceEncoding::Cp949);
    assert!(outcome.rewritten());
    assert_eq!(outcome.path, dir.path().join("companies_utf8.csv"));
    assert_eq!(outcome.records, 4);
    assert_eq!(read_rows(&outcome.path), expected_rows());
    // Source untouched.
    assert_eq!(fs::read(&source).unwrap(), bytes.as_ref());

    let encoding = sniff(&outcome.path).unwrap().unwrap();
    assert_eq!(encoding, SniffedEncoding::Utf8);
    let headers = read_csv_header(&outcome.path, encoding).unwrap();
    assert_eq!(headers.columns, vec!["id", "name", "amount"]);
}

#[test]
fn utf16_source_gets_utf8_sibling() {
    let dir = tempdir().unwrap();
    let source = write_source(&dir, "companies.csv", &utf16le(SAMPLE));

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.detected, SourceEncoding::Utf16);
    assert_eq!(outcome.path, normalized_path(&source));
    assert_eq!(read_rows(&outcome.path), expected_rows());
}

#[test]
fn utf8_source_is_reused() {
    let dir = tempdir().unwrap();
    let source = write_source(&dir, "companies.csv", SAMPLE.as_bytes());

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.detected, SourceEncoding::Utf8);
    assert_eq!(outcome.path, source);
    assert!(!outcome.rewritten());
    assert!(!normalized_path(&source).exists());

    // Normalizing the result again is a no-op too.
    let again = normalize(&outcome.path).unwrap();
    assert_eq!(again.path, source);
}

#[test]
fn repeated_normalization_is_byte_identical() {
    let dir = tempdir().unwrap();
    let (bytes, _, _) = EUC_KR.encode(SAMPLE);
    let source = write_source(&dir, "companies.csv", &bytes);

    let first = normalize(&source).unwrap();
    let first_bytes = fs::read(&first.path).unwrap();
    let second = normalize(&source).unwrap();
    let second_bytes = fs::read(&second.path).unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(first_bytes, second_bytes);

    // The UTF-8 copy itself needs no further work.
    let third = normalize(&first.path).unwrap();
    assert_eq!(third.path, first.path);
    assert!(!third.rewritten());
}

#[test]
fn duplicate_and_empty_columns_survive() {
    let dir = tempdir().unwrap();
    let text = "id,이름,id,\n1,가,2,\n";
    let (bytes, _, _) = EUC_KR.encode(text);
    let source = write_source(&dir, "dupes.csv", &bytes);

    let outcome = normalize(&source).unwrap();

    assert_eq!(fs::read_to_string(&outcome.path).unwrap(), text);
}

#[test]
fn empty_source_does_not_crash() {
    let dir = tempdir().unwrap();
    let source = write_source(&dir, "empty.csv", b"");

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.detected, SourceEncoding::Utf8);
    assert_eq!(outcome.path, source);
    assert_eq!(outcome.records, 0);
}

#[test]
fn header_only_source() {
    let dir = tempdir().unwrap();
    let (bytes, _, _) = EUC_KR.encode("사업장명,금액\n");
    let source = write_source(&dir, "header.csv", &bytes);

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.records, 1);
    assert_eq!(
        fs::read_to_string(&outcome.path).unwrap(),
        "사업장명,금액\n"
    );
}

#[test]
fn undetectable_source_writes_nothing() {
    let dir = tempdir().unwrap();
    let source = write_source(&dir, "broken.csv", b"\xFF\x80\x00");

    let result = normalize(&source);

    match result {
        Err(IngestError::EncodingDetection { attempts, .. }) => {
            assert_eq!(attempts.len(), 3);
        }
        other => panic!("expected detection failure, got {other:?}"),
    }
    assert!(!normalized_path(&source).exists());
}

#[test]
fn utf8_source_with_short_row_is_reused() {
    let dir = tempdir().unwrap();
    let source = write_source(&dir, "short.csv", b"id,name,amount\n1,ab,3\n2,cde\n");

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.detected, SourceEncoding::Utf8);
    assert!(!outcome.rewritten());
    assert_eq!(outcome.records, 3);
    assert!(!normalized_path(&source).exists());
}

#[test]
fn cp949_source_with_short_row_keeps_content() {
    let dir = tempdir().unwrap();
    let text = "id,name,amount\n1,가,3\n2,나다\n";
    let (bytes, _, _) = EUC_KR.encode(text);
    let source = write_source(&dir, "short.csv", &bytes);

    let outcome = normalize(&source).unwrap();

    assert_eq!(outcome.detected, SourceEncoding::Cp949);
    assert_eq!(fs::read_to_string(&outcome.path).unwrap(), text);
}

#[test]
fn row_longer_than_header_is_rejected() {
    let dir = tempdir().unwrap();
    // Fifteen bytes, so the UTF-16 candidate cannot decode it either.
    let (bytes, _, _) = EUC_KR.encode("id,name\n1,가,3\n");
    assert_eq!(bytes.len(), 15);
    let source = write_source(&dir, "long.csv", &bytes);

    let result = normalize(&source);

    match result {
        Err(IngestError::EncodingDetection { attempts, .. }) => {
            assert!(attempts[1].starts_with("cp949: record 2 has 3 fields"));
        }
        other => panic!("expected detection failure, got {other:?}"),
    }
    assert!(!normalized_path(&source).exists());
}
