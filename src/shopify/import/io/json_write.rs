use std::fs;
use std::path::Path;

use crate::shopify::import::error::Result;
use crate::shopify::import::model::ProductRecord;

/// Writes the records as a pretty-printed JSON array. Object keys follow the
/// CSV column order.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> Result<()> {
    let json_string = serde_json::to_string_pretty(records)?;
    fs::write(path, json_string)?;
    Ok(())
}
