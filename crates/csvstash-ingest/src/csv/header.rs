//! CSV header row.

use std::collections::BTreeSet;

/// Column names from the first row of a CSV file.
///
/// Names are kept verbatim and in file order; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeaders {
    pub columns: Vec<String>,
}

impl CsvHeaders {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns true if a column with this exact name exists.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Names that appear more than once, in order of first repetition.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut repeated = Vec::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) && !repeated.contains(&column.as_str()) {
                repeated.push(column.as_str());
            }
        }
        repeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> CsvHeaders {
        CsvHeaders::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_csv_headers_basic() {
        let headers = headers(&["A", "B"]);
        assert_eq!(headers.len(), 2);
        assert!(!headers.is_empty());
        assert!(headers.contains("A"));
        assert!(!headers.contains("a"));
    }

    #[test]
    fn test_duplicates() {
        let headers = headers(&["id", "name", "id", "name", "id", "amount"]);
        assert_eq!(headers.duplicates(), vec!["id", "name"]);
        assert!(self::headers(&["id", "name"]).duplicates().is_empty());
    }
}
