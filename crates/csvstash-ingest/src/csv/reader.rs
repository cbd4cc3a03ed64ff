//! Header extraction from a CSV file in a sniffed encoding.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{IngestError, Result};
use crate::sniff::SniffedEncoding;

use super::decode::DecodingReader;
use super::header::CsvHeaders;

/// Reads only the first record of `path` as column names.
///
/// The file is decoded with `encoding` while streaming; rows after the header
/// are never read. Fails with [`IngestError::EmptyCsv`] when the file has no
/// record and [`IngestError::NoHeaderDetected`] when the first record is blank.
pub fn read_csv_header(path: &Path, encoding: SniffedEncoding) -> Result<CsvHeaders> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let decoded = DecodingReader::new(BufReader::new(file), encoding.new_decoder());

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded);

    let mut record = StringRecord::new();
    let found = reader.read_record(&mut record).map_err(|e| {
        if let csv::ErrorKind::Io(io) = e.kind() {
            if io.kind() == ErrorKind::InvalidData {
                return IngestError::Decode {
                    path: path.to_path_buf(),
                    encoding: encoding.label(),
                };
            }
        }
        IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    if !found {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let columns: Vec<String> = record
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            // A BOM the decoder did not know about (e.g. sniffed as ascii) stays out.
            if idx == 0 {
                value.trim_start_matches('\u{feff}').to_string()
            } else {
                value.to_string()
            }
        })
        .collect();

    if columns.iter().all(|c| c.trim().is_empty()) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    Ok(CsvHeaders::new(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::EUC_KR;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_header_utf8() {
        let file = create_temp_csv("id,사업장명,amount\n1,가,3\n".as_bytes());
        let headers = read_csv_header(file.path(), SniffedEncoding::Utf8).unwrap();
        assert_eq!(headers.columns, vec!["id", "사업장명", "amount"]);
    }

    #[test]
    fn test_read_header_keeps_whitespace_and_duplicates() {
        let file = create_temp_csv(b" id ,name,id\n");
        let headers = read_csv_header(file.path(), SniffedEncoding::Ascii).unwrap();
        assert_eq!(headers.columns, vec![" id ", "name", "id"]);
    }

    #[test]
    fn test_read_header_quoted() {
        let file = create_temp_csv(b"\"last, first\",\"say \"\"hi\"\"\"\n");
        let headers = read_csv_header(file.path(), SniffedEncoding::Ascii).unwrap();
        assert_eq!(headers.columns, vec!["last, first", "say \"hi\""]);
    }

    #[test]
    fn test_read_header_euc_kr() {
        let (bytes, _, _) = EUC_KR.encode("사업장명,금액\n주식회사 가,1\n");
        let file = create_temp_csv(&bytes);
        let headers = read_csv_header(file.path(), SniffedEncoding::EucKr).unwrap();
        assert_eq!(headers.columns, vec!["사업장명", "금액"]);
    }

    #[test]
    fn test_read_header_with_bom() {
        let file = create_temp_csv(b"\xEF\xBB\xBFA,B,C\n1,2,3\n");
        let headers = read_csv_header(file.path(), SniffedEncoding::Utf8Sig).unwrap();
        assert_eq!(headers.columns, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_read_header_empty_file() {
        let file = create_temp_csv(b"");
        let result = read_csv_header(file.path(), SniffedEncoding::Utf8);
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_header_blank_row() {
        let file = create_temp_csv(b"  \n1\n");
        let result = read_csv_header(file.path(), SniffedEncoding::Ascii);
        assert!(matches!(result, Err(IngestError::NoHeaderDetected { .. })));
    }

    #[test]
    fn test_read_header_wrong_encoding() {
        let (bytes, _, _) = EUC_KR.encode("사업장명\n");
        let file = create_temp_csv(&bytes);
        let result = read_csv_header(file.path(), SniffedEncoding::Utf8);
        assert!(matches!(result, Err(IngestError::Decode { .. })));
    }

    #[test]
    fn test_read_header_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv_header(&dir.path().join("gone.csv"), SniffedEncoding::Utf8);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
