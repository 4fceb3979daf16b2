use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::shopify::import::error::{ImportError, Result};
use crate::shopify::import::model::ProductRecord;

/// Writes the records to a CSV file, header row first. The header is written
/// even when there are no records.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    write_all(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Renders the records as CSV text in memory.
pub fn to_csv_string(records: &[ProductRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    write_all(&mut writer, records)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ImportError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| ImportError::InvalidEncoding(err.to_string()))
}

fn write_all<W: Write>(writer: &mut Writer<W>, records: &[ProductRecord]) -> Result<()> {
    writer.write_record(ProductRecord::HEADERS)?;
    for record in records {
        writer.write_record(record.values())?;
    }
    Ok(())
}
