use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::shopify::import::error::{ImportError, Result};
use crate::shopify::import::model::{RawRow, columns, normalize_header};

/// Reads a Shopify product export saved as an Excel workbook.
///
/// The first row of the sheet holds the headers. When `sheet` is `None` the
/// first sheet of the workbook is used.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::InvalidWorkbook("workbook has no sheets".into()))?,
    };

    let range = read_required_sheet(&mut workbook, &sheet_name)?;
    rows_from_range(&range)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ImportError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ImportError::from)?;
    Ok(range)
}

fn rows_from_range(range: &Range<DataType>) -> Result<Vec<RawRow>> {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| normalize_header(&cell_to_string(Some(cell))))
            .collect(),
        None => return Ok(Vec::new()),
    };

    if !headers.iter().any(|header| header == columns::HANDLE) {
        return Err(ImportError::MissingColumn(columns::HANDLE.to_string()));
    }

    let rows = rows_iter
        .map(|row| {
            RawRow::from_fields(
                headers
                    .iter()
                    .enumerate()
                    .map(|(col_idx, header)| (header.as_str(), cell_to_string(row.get(col_idx)))),
            )
        })
        .collect();

    Ok(rows)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        // Shopify spells its flags in upper case.
        Some(DataType::Bool(true)) => "TRUE".to_string(),
        Some(DataType::Bool(false)) => "FALSE".to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
