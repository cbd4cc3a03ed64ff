//! CSV reading and writing utilities.

mod decode;
mod header;
mod reader;
mod writer;

pub use decode::DecodingReader;
pub use header::CsvHeaders;
pub use reader::read_csv_header;
pub use writer::{encode_records, write_atomic};
