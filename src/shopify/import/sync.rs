use std::path::Path;

use tracing::{debug, info, instrument};

use crate::shopify::import::aggregate;
use crate::shopify::import::error::Result;
use crate::shopify::import::io::csv_read::{self, InputEncoding};
use crate::shopify::import::io::{csv_write, excel_read, excel_write, json_write};
use crate::shopify::import::model::{ProductRecord, RawRow};

/// Format of a Shopify product export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Excel,
}

impl InputFormat {
    /// Guesses the format from the file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        match extension(path)?.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xlsm" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Format the aggregated products are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Excel,
    Json,
}

impl OutputFormat {
    /// Guesses the format from the file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        match extension(path)?.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" => Some(Self::Excel),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Reader settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Encoding of CSV input. Ignored for workbooks.
    pub encoding: InputEncoding,
    /// Sheet to read from a workbook; the first sheet when unset.
    pub sheet: Option<String>,
}

/// Reads the export rows from `input`.
pub fn read_rows(
    input: &Path,
    format: InputFormat,
    options: &TransformOptions,
) -> Result<Vec<RawRow>> {
    match format {
        InputFormat::Csv => csv_read::read_rows(input, options.encoding),
        InputFormat::Excel => excel_read::read_rows(input, options.sheet.as_deref()),
    }
}

/// Writes the aggregated records to `output`.
pub fn write_records(output: &Path, records: &[ProductRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => csv_write::write_records(output, records),
        OutputFormat::Excel => excel_write::write_records(output, records),
        OutputFormat::Json => json_write::write_records(output, records),
    }
}

/// Aggregates a product export and writes one record per product. Returns
/// the number of products written.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display(), ?input_format, ?output_format)
)]
pub fn transform(
    input: &Path,
    input_format: InputFormat,
    output: &Path,
    output_format: OutputFormat,
    options: &TransformOptions,
) -> Result<usize> {
    let rows = read_rows(input, input_format, options)?;
    info!(row_count = rows.len(), "read product export");
    let records = aggregate::ingest(rows);
    debug!(product_count = records.len(), "products aggregated");
    write_records(output, &records, output_format)?;
    Ok(records.len())
}

/// Aggregates a CSV product export and renders the result as CSV text.
#[instrument(level = "info", skip_all, fields(input = %input.display(), ?encoding))]
pub fn products_to_csv(input: &Path, encoding: InputEncoding) -> Result<String> {
    let rows = csv_read::read_rows(input, encoding)?;
    info!(row_count = rows.len(), "read product export");
    let records = aggregate::ingest(rows);
    csv_write::to_csv_string(&records)
}
