use std::path::Path;

use rust_xlsxwriter::{Table, Workbook};

use crate::shopify::import::error::Result;
use crate::shopify::import::model::ProductRecord;

/// Name of the sheet holding the aggregated products.
pub const PRODUCTS_SHEET: &str = "Products";

/// Writes the records to a single-sheet workbook. Non-empty output is wrapped
/// in an autofiltered table.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(PRODUCTS_SHEET)?;

    for (col_idx, header) in ProductRecord::HEADERS.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, *header)?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        for (col_idx, cell) in record.values().iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, *cell)?;
        }
    }

    if !records.is_empty() {
        let mut table = Table::new();
        table.set_autofilter(true);
        let col_end = (ProductRecord::HEADERS.len() as u16).saturating_sub(1);
        worksheet.add_table(0, 0, records.len() as u32, col_end, &table)?;
    }

    workbook.save(path)?;
    Ok(())
}
