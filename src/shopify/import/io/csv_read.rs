use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::shopify::import::error::{ImportError, Result};
use crate::shopify::import::model::{RawRow, columns, normalize_header};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding of a CSV export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputEncoding {
    /// UTF-8, with or without a byte order mark.
    #[default]
    Utf8,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

impl InputEncoding {
    fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            InputEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|err| ImportError::InvalidEncoding(err.to_string())),
            InputEncoding::Latin1 => Ok(bytes.iter().map(|&byte| char::from(byte)).collect()),
        }
    }
}

/// Reads a Shopify product export from a CSV file.
pub fn read_rows(path: &Path, encoding: InputEncoding) -> Result<Vec<RawRow>> {
    let file = File::open(path)?;
    parse_rows(file, encoding)
}

/// Reads a Shopify product export from any CSV source. The first record is
/// the header row; an empty source yields no rows.
pub fn parse_rows<R: Read>(source: R, encoding: InputEncoding) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut records = reader.byte_records();

    let headers = match records.next() {
        Some(record) => decode_headers(&record?, encoding)?,
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let mut fields = Vec::with_capacity(headers.len());
        for (header, cell) in headers.iter().zip(record.iter()) {
            fields.push((header.as_str(), encoding.decode(cell)?));
        }
        rows.push(RawRow::from_fields(fields));
    }

    Ok(rows)
}

fn decode_headers(record: &ByteRecord, encoding: InputEncoding) -> Result<Vec<String>> {
    let mut headers = Vec::with_capacity(record.len());
    for (idx, cell) in record.iter().enumerate() {
        let cell = match (idx, encoding) {
            (0, InputEncoding::Utf8) => cell.strip_prefix(UTF8_BOM).unwrap_or(cell),
            _ => cell,
        };
        headers.push(normalize_header(&encoding.decode(cell)?));
    }

    if !headers.iter().any(|header| header == columns::HANDLE) {
        return Err(ImportError::MissingColumn(columns::HANDLE.to_string()));
    }

    Ok(headers)
}
